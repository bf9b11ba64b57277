//! Theme toggle example for routeview-rs
//!
//! This example demonstrates how to:
//! - Create a session against the in-memory engine
//! - Deliver the style-ready signal the engine would fire
//! - Select a route and switch styles without losing it

use routeview_rs::prelude::*;
use routeview_rs::sim;

fn main() -> Result<()> {
    println!("=== RouteView Theme Toggle Example ===\n");

    let (mut session, journal) = sim::create_session(ViewConfig::default())?;
    println!("Created session: style={} phase={}", session.style(), session.phase());

    // Example 1: the first style load attaches both controls
    println!("\n--- Example 1: First style load ---");
    sim::complete_style_load(&mut session)?;
    println!("Phase: {}", session.phase());
    for kind in session.attached_kinds() {
        if let Some(id) = session.control_id(kind) {
            println!("  {kind} attached as {id}");
        }
    }

    // Example 2: a route chosen in the directions control is drawn
    println!("\n--- Example 2: Select a route ---");
    if let Some(source) = session.control_id(ControlKind::DirectionsPlanner) {
        let route: RouteGeometry = [
            LngLat::new(77.2295, 28.6129),
            LngLat::new(77.2167, 28.6315),
            LngLat::new(77.2090, 28.6562),
        ]
        .into_iter()
        .collect();
        session.dispatch(SessionEvent::RouteSelected {
            source,
            routes: vec![RouteCandidate::new(route)],
        })?;
    }
    println!("Stored route: {} points", session.route().map_or(0, |r| r.len()));

    // Example 3: toggle the style and wait for the new one
    println!("\n--- Example 3: Toggle style ---");
    let mark = journal.len();
    session.toggle_style()?;
    println!("Requested {} ({}), phase={}", session.style(), session.generation(), session.phase());
    sim::complete_style_load(&mut session)?;
    println!("Phase: {}", session.phase());
    println!("Overlay consistent: {}", session.overlay_consistent());

    println!("\nEngine calls during the toggle:");
    for call in journal.calls_since(mark) {
        println!("  {call}");
    }

    session.teardown();
    println!("\nTorn down: phase={}", session.phase());
    Ok(())
}

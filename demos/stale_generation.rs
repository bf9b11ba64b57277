//! Overlapping style requests for routeview-rs
//!
//! This example demonstrates how to:
//! - Issue a second style request before the first one has loaded
//! - Deliver the style-ready signals in their original order
//! - See that only the newest request attaches controls

use routeview_rs::prelude::*;
use routeview_rs::sim;

fn main() -> Result<()> {
    println!("=== RouteView Stale Generation Example ===\n");

    let (mut session, _journal) = sim::create_session(ViewConfig::default())?;
    sim::complete_style_load(&mut session)?;
    println!("Ready with {} ({})", session.style(), session.generation());

    session.set_style(Style::Light)?;
    session.set_style(Style::Dark)?;
    println!(
        "Two requests in flight; current is {} ({})",
        session.style(),
        session.generation()
    );

    let fired = match session.engine_mut() {
        Some(engine) => engine.finish_style_load(),
        None => Vec::new(),
    };

    for generation in fired {
        session.dispatch(SessionEvent::StyleReady(generation))?;
        println!(
            "Signal for {generation}: phase={} controls={:?}",
            session.phase(),
            session.attached_kinds()
        );
    }

    if let Some(engine) = session.engine() {
        for kind in ControlKind::ALL {
            println!("{kind}: {} instance(s) on the map", engine.control_count(kind));
        }
    }
    Ok(())
}

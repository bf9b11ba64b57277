// crates/routeview-core/src/sim/script.rs

//! Scenario scripts: a JSON list of user actions and engine events replayed
//! against a simulated session.
//!
//! ```json
//! [
//!   { "op": "create", "style": "dark" },
//!   { "op": "style_ready" },
//!   { "op": "position", "position": [77.2295, 28.6129] },
//!   { "op": "route", "coordinates": [[77.2295, 28.6129], [77.21, 28.63]] },
//!   { "op": "set_style", "style": "light" },
//!   { "op": "style_ready" },
//!   { "op": "teardown" }
//! ]
//! ```
//!
//! `position` and `route` events are emitted by the currently attached
//! control unless `source` names a control id explicitly, which is how a
//! script simulates a late event from a detached instance.

use super::{complete_style_load, Call, Journal, SimControls, SimEngine, SimSession};
use crate::common::{ControlId, ControlKind, LngLat, Phase, Style, Viewport};
use crate::config::ViewConfig;
use crate::error::{Result, ViewError};
use crate::geometry::{RouteCandidate, RouteGeometry};
use crate::session::{MapSession, SessionEvent};
use crate::traits::MapOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Create the session. Omitted fields come from the config.
    Create {
        #[serde(default)]
        style: Option<Style>,
        #[serde(default)]
        center: Option<LngLat>,
        #[serde(default)]
        zoom: Option<f64>,
    },
    /// Finish the pending style load and deliver every queued signal.
    StyleReady,
    SetStyle { style: Style },
    ToggleStyle,
    /// The geolocation control acquires a position.
    Position {
        position: LngLat,
        #[serde(default)]
        source: Option<u64>,
    },
    /// The directions control selects a route.
    Route {
        coordinates: Vec<LngLat>,
        #[serde(default)]
        source: Option<u64>,
    },
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

/// Final state of a scenario run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub calls: Vec<Call>,
    pub phase: Option<Phase>,
    pub style: Option<Style>,
    pub attached: Vec<ControlKind>,
    pub route_points: Option<usize>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ViewError::Scenario(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// The toggle walkthrough: start dark over New Delhi, pick a route,
    /// switch to light, and end with the route redrawn.
    pub fn theme_toggle() -> Self {
        let route = vec![
            LngLat::new(77.2295, 28.6129),
            LngLat::new(77.2167, 28.6315),
            LngLat::new(77.2090, 28.6562),
        ];
        Self {
            steps: vec![
                Step::Create {
                    style: Some(Style::Dark),
                    center: Some(LngLat::new(77.2295, 28.6129)),
                    zoom: Some(9.0),
                },
                Step::StyleReady,
                Step::Position {
                    position: LngLat::new(77.2295, 28.6129),
                    source: None,
                },
                Step::Route {
                    coordinates: route,
                    source: None,
                },
                Step::SetStyle { style: Style::Light },
                Step::StyleReady,
            ],
        }
    }

    /// Runs every step in order against a fresh simulated session.
    pub fn run(&self, config: &ViewConfig) -> Result<Report> {
        let journal = Journal::default();
        let mut session: Option<SimSession> = None;

        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "scenario step");
            if let Step::Create { style, center, zoom } = step {
                if session.is_some() {
                    return Err(ViewError::Scenario(format!(
                        "step {index}: the session was already created"
                    )));
                }
                let defaults = config.viewport;
                let viewport = Viewport {
                    center: center.unwrap_or(defaults.center),
                    zoom: zoom.unwrap_or(defaults.zoom),
                };
                let controls = SimControls::new(journal.clone());
                session = Some(MapSession::create_with(
                    config.clone(),
                    style.unwrap_or(config.initial_style),
                    viewport,
                    |options: &MapOptions| SimEngine::new(journal.clone(), options),
                    controls,
                )?);
                continue;
            }

            let Some(session) = session.as_mut() else {
                tracing::debug!(index, "no session yet; step skipped");
                continue;
            };
            apply(session, step)?;
        }

        Ok(Report {
            calls: journal.calls(),
            phase: session.as_ref().map(|s| s.phase()),
            style: session.as_ref().map(|s| s.style()),
            attached: session
                .as_ref()
                .map(|s| s.attached_kinds())
                .unwrap_or_default(),
            route_points: session
                .as_ref()
                .and_then(|s| s.route().map(RouteGeometry::len)),
        })
    }
}

fn apply(session: &mut SimSession, step: &Step) -> Result<()> {
    match step {
        Step::Create { .. } => Ok(()),
        Step::StyleReady => complete_style_load(session).map(|_| ()),
        #[cfg(feature = "theme-toggle")]
        Step::SetStyle { style } => session.set_style(*style),
        #[cfg(feature = "theme-toggle")]
        Step::ToggleStyle => session.toggle_style(),
        #[cfg(not(feature = "theme-toggle"))]
        Step::SetStyle { .. } | Step::ToggleStyle => Err(ViewError::Scenario(
            "theme toggling is not enabled in this build".to_string(),
        )),
        Step::Position { position, source } => {
            let Some(source) = source_for(session, ControlKind::Geolocation, *source) else {
                tracing::debug!("no geolocation control attached; position dropped");
                return Ok(());
            };
            session.dispatch(SessionEvent::PositionAcquired {
                source,
                position: *position,
            })
        }
        Step::Route {
            coordinates,
            source,
        } => {
            let Some(source) = source_for(session, ControlKind::DirectionsPlanner, *source) else {
                tracing::debug!("no directions control attached; route dropped");
                return Ok(());
            };
            let geometry = RouteGeometry::new(coordinates.clone());
            session.dispatch(SessionEvent::RouteSelected {
                source,
                routes: vec![RouteCandidate::new(geometry)],
            })
        }
        Step::Teardown => {
            session.teardown();
            Ok(())
        }
    }
}

fn source_for(session: &SimSession, kind: ControlKind, explicit: Option<u64>) -> Option<ControlId> {
    explicit.map(ControlId).or_else(|| session.control_id(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let scenario = Scenario::from_json_str(
            r#"[
                {"op":"create"},
                {"op":"style_ready"},
                {"op":"set_style","style":"light"},
                {"op":"position","position":[1.0,2.0],"source":7},
                {"op":"route","coordinates":[[1,2],[3,4]]},
                {"op":"teardown"}
            ]"#,
        )
        .unwrap();
        assert_eq!(scenario.steps.len(), 6);
        assert_eq!(
            scenario.steps[0],
            Step::Create {
                style: None,
                center: None,
                zoom: None
            }
        );
        assert_eq!(
            scenario.steps[3],
            Step::Position {
                position: LngLat::new(1.0, 2.0),
                source: Some(7)
            }
        );
    }

    #[test]
    fn rejects_unknown_ops() {
        assert!(Scenario::from_json_str(r#"[{"op":"zoom_in"}]"#).is_err());
    }

    #[test]
    fn second_create_is_an_error() {
        let scenario = Scenario::from_json_str(r#"[{"op":"create"},{"op":"create"}]"#).unwrap();
        let err = scenario.run(&ViewConfig::default()).unwrap_err();
        assert!(matches!(err, ViewError::Scenario(_)));
    }

    #[test]
    fn steps_before_create_are_skipped() {
        let scenario =
            Scenario::from_json_str(r#"[{"op":"style_ready"},{"op":"teardown"}]"#).unwrap();
        let report = scenario.run(&ViewConfig::default()).unwrap();
        assert!(report.calls.is_empty());
        assert_eq!(report.phase, None);
    }
}

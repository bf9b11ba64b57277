// crates/routeview-core/src/overlay.rs

//! # Route Overlay
//!
//! Projects the stored route onto the live map as one GeoJSON source plus
//! one line layer. The manager keeps no shadow state: it asks the engine
//! what currently exists and adds, updates or removes accordingly.
//!
//! Adding primitives before the style has loaded is undefined behaviour in
//! the engine, so [`RouteOverlayManager::materialize`] demands a
//! [`ReadyProof`]. Only the session can mint one, and only while it is in
//! [`Phase::Ready`](crate::Phase::Ready). A proof minted by the style-ready
//! continuation also vouches for the style itself: the engine's own
//! "loaded" predicate can lag behind that signal while tiles are pending.

use crate::error::{InvariantViolation, Result};
use crate::geometry::RouteGeometry;
use crate::traits::MapEngine;
use serde::Serialize;

pub const ROUTE_SOURCE_ID: &str = "route";
pub const ROUTE_LAYER_ID: &str = "route";
pub const ROUTE_LINE_COLOR: &str = "#3887be";
pub const ROUTE_LINE_WIDTH: f64 = 5.0;

/// Evidence that the session is in the Ready phase.
///
/// Cannot be constructed outside this crate.
#[derive(Debug)]
pub struct ReadyProof {
    style_confirmed: bool,
}

impl ReadyProof {
    /// Ready, style state unknown; `materialize` asks the engine.
    pub(crate) fn new() -> Self {
        Self {
            style_confirmed: false,
        }
    }

    /// Ready, minted inside a style-ready continuation.
    pub(crate) fn confirmed() -> Self {
        Self {
            style_confirmed: true,
        }
    }
}

// -----------------------------------------------------------------------------
// LAYER DEFINITION
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LineLayout {
    pub line_join: String,
    pub line_cap: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinePaint {
    pub line_color: String,
    pub line_width: f64,
}

/// A line layer drawing one source; serializes to the engine's layer JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub layout: LineLayout,
    pub paint: LinePaint,
}

impl LineLayer {
    /// The fixed route layer: round joins and caps, blue 5px stroke.
    pub fn route() -> Self {
        Self {
            id: ROUTE_LAYER_ID.to_string(),
            kind: "line".to_string(),
            source: ROUTE_SOURCE_ID.to_string(),
            layout: LineLayout {
                line_join: "round".to_string(),
                line_cap: "round".to_string(),
            },
            paint: LinePaint {
                line_color: ROUTE_LINE_COLOR.to_string(),
                line_width: ROUTE_LINE_WIDTH,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// MANAGER
// -----------------------------------------------------------------------------

/// What [`RouteOverlayManager::materialize`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// Source and layer were added.
    Created,
    /// The existing source received new data; the layer was left alone.
    Updated,
}

#[derive(Debug, Clone)]
pub struct RouteOverlayManager {
    layer: LineLayer,
}

impl Default for RouteOverlayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteOverlayManager {
    pub fn new() -> Self {
        Self {
            layer: LineLayer::route(),
        }
    }

    pub fn layer(&self) -> &LineLayer {
        &self.layer
    }

    /// Draws `geometry`, reusing the existing source when there is one so
    /// the layer is not torn down and repainted.
    pub fn materialize<E: MapEngine>(
        &self,
        engine: &mut E,
        ready: &ReadyProof,
        geometry: &RouteGeometry,
    ) -> Result<Materialized> {
        if !ready.style_confirmed && !engine.is_style_loaded() {
            tracing::error!("route overlay requested while the engine style is still loading");
            return Err(InvariantViolation::StyleNotLoaded.into());
        }

        let outcome = if engine.has_source(&self.layer.source) {
            engine.set_source_data(&self.layer.source, geometry);
            Materialized::Updated
        } else {
            engine.add_geojson_source(&self.layer.source, geometry);
            Materialized::Created
        };
        if !engine.has_layer(&self.layer.id) {
            engine.add_line_layer(&self.layer);
        }

        tracing::debug!(points = geometry.len(), ?outcome, "route overlay materialized");
        Ok(outcome)
    }

    /// Removes the overlay. Returns whether anything was removed.
    pub fn clear<E: MapEngine>(&self, engine: &mut E) -> bool {
        let mut removed = false;
        // The layer references the source, so it goes first.
        if engine.has_layer(&self.layer.id) {
            engine.remove_layer(&self.layer.id);
            removed = true;
        }
        if engine.has_source(&self.layer.source) {
            engine.remove_source(&self.layer.source);
            removed = true;
        }
        removed
    }

    pub fn is_materialized<E: MapEngine>(&self, engine: &E) -> bool {
        engine.has_source(&self.layer.source) && engine.has_layer(&self.layer.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LngLat;
    use crate::error::ViewError;
    use crate::sim::{Call, Journal, SimEngine};
    use crate::traits::MapOptions;

    fn loaded_engine() -> (SimEngine, Journal) {
        let journal = Journal::default();
        let mut engine = SimEngine::new(
            journal.clone(),
            &MapOptions {
                style_url: "style://test".to_string(),
                viewport: Default::default(),
            },
        );
        engine.finish_style_load();
        (engine, journal)
    }

    fn route(n: usize) -> RouteGeometry {
        (0..n).map(|i| LngLat::new(i as f64, i as f64)).collect()
    }

    #[test]
    fn layer_json_has_fixed_paint() {
        let json = serde_json::to_value(LineLayer::route()).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["source"], "route");
        assert_eq!(json["paint"]["line-color"], "#3887be");
        assert_eq!(json["paint"]["line-width"], 5.0);
        assert_eq!(json["layout"]["line-join"], "round");
        assert_eq!(json["layout"]["line-cap"], "round");
    }

    #[test]
    fn second_materialize_updates_in_place() {
        let (mut engine, journal) = loaded_engine();
        let manager = RouteOverlayManager::new();
        let proof = ReadyProof::new();

        let first = manager.materialize(&mut engine, &proof, &route(2)).unwrap();
        let second = manager.materialize(&mut engine, &proof, &route(3)).unwrap();

        assert_eq!(first, Materialized::Created);
        assert_eq!(second, Materialized::Updated);
        assert_eq!(engine.source_data(ROUTE_SOURCE_ID), Some(&route(3)));

        let calls = journal.calls();
        let layer_adds = calls
            .iter()
            .filter(|c| matches!(c, Call::AddLayer(id) if id == ROUTE_LAYER_ID))
            .count();
        assert_eq!(layer_adds, 1);
        assert!(calls.contains(&Call::SetSourceData(ROUTE_SOURCE_ID.to_string())));
    }

    #[test]
    fn refuses_an_unloaded_style() {
        let (mut engine, _) = loaded_engine();
        engine.set_style("style://other");

        let err = RouteOverlayManager::new()
            .materialize(&mut engine, &ReadyProof::new(), &route(2))
            .unwrap_err();
        assert!(matches!(
            err,
            ViewError::Invariant(InvariantViolation::StyleNotLoaded)
        ));
        assert!(!engine.has_source(ROUTE_SOURCE_ID));
    }

    #[test]
    fn confirmed_proof_draws_while_tiles_are_pending() {
        let (mut engine, _) = loaded_engine();
        engine.set_tiles_pending(true);
        assert!(!engine.is_style_loaded());

        let manager = RouteOverlayManager::new();
        let outcome = manager
            .materialize(&mut engine, &ReadyProof::confirmed(), &route(2))
            .unwrap();

        assert_eq!(outcome, Materialized::Created);
        assert_eq!(engine.layer_ids(), vec![manager.layer().id.as_str()]);
        assert_eq!(engine.source_ids(), vec![manager.layer().source.as_str()]);
    }

    #[test]
    fn clear_is_idempotent() {
        let (mut engine, _) = loaded_engine();
        let manager = RouteOverlayManager::new();
        manager
            .materialize(&mut engine, &ReadyProof::new(), &route(2))
            .unwrap();
        assert!(manager.is_materialized(&engine));

        assert!(manager.clear(&mut engine));
        assert!(!manager.clear(&mut engine));
        assert!(!manager.is_materialized(&engine));
    }
}

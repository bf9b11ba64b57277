// crates/routeview-core/src/lib.rs

//! # routeview-core
//!
//! Keeps the stateful add-ons of an interactive route map consistent while the
//! rendering engine reloads its style.
//!
//! A [`MapSession`] owns one engine instance and moves through
//! `Initializing → Ready ⇄ StyleSwapping → Closed`. On every style change it
//! detaches the geolocation and directions controls, requests the new style,
//! and once the engine reports the style loaded it re-attaches the controls
//! and redraws the selected route. Overlapping style changes are settled by a
//! generation counter: only the newest request's continuation acts.
//!
//! The engine and the controls are collaborators behind the [`MapEngine`] and
//! [`ControlBackend`] traits. `routeview-wasm` implements them for Mapbox GL
//! JS; the [`sim`] module implements them in memory.

pub mod common;
pub mod config;
pub mod error;
pub mod geometry;
pub mod overlay; // Route line source + layer
pub mod registry; // Attached controls and their event wiring
pub mod session; // The state machine
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod store;
pub mod traits;

// Re-exports
pub use crate::common::{
    Anchor, ControlId, ControlKind, LngLat, Phase, Style, StyleGeneration, UnknownStyle, Viewport,
};
pub use crate::config::ViewConfig;
pub use crate::error::{InvariantViolation, Result, ViewError};
pub use crate::geometry::{RouteCandidate, RouteGeometry};
pub use crate::overlay::{LineLayer, RouteOverlayManager};
pub use crate::registry::ControlRegistry;
pub use crate::session::{MapSession, SessionEvent};
pub use crate::store::OverlayStore;
pub use crate::traits::{ControlBackend, MapEngine, MapOptions};

pub mod prelude {
    //! Everything an embedding needs in one import.
    pub use crate::{
        Anchor, ControlBackend, ControlId, ControlKind, LineLayer, LngLat, MapEngine, MapOptions,
        MapSession, Phase, Result, RouteCandidate, RouteGeometry, SessionEvent, Style,
        StyleGeneration, ViewConfig, ViewError, Viewport,
    };
}

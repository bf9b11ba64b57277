// crates/routeview-core/src/traits.rs

//! Contracts of the external collaborators.
//!
//! The session never talks to a concrete renderer. It drives a [`MapEngine`]
//! (map instance, style loading, sources, layers, control slots) and a
//! [`ControlBackend`] (construction and the two imperative primitives of the
//! geolocation and directions add-ons). The `routeview-wasm` crate implements
//! both on top of Mapbox GL JS; [`crate::sim`] implements them in memory.
//!
//! Events flow the other way: whatever embeds the session delivers engine and
//! control events as [`crate::session::SessionEvent`]s.

use crate::common::{Anchor, ControlId, ControlKind, LngLat, StyleGeneration, Viewport};
use crate::config::ViewConfig;
use crate::geometry::RouteGeometry;
use crate::overlay::LineLayer;

/// What the engine needs to construct a map instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub style_url: String,
    pub viewport: Viewport,
}

/// The rendering engine, as consumed by the session.
///
/// All methods are synchronous with respect to the engine's internal state.
/// Style loading is the only asynchronous part: [`MapEngine::set_style`]
/// returns immediately and readiness is announced later through the one-shot
/// subscription made with [`MapEngine::once_style_ready`].
pub trait MapEngine {
    /// Engine-side handle of anything that can sit in a control slot.
    type Control;

    /// True once the current style has finished loading and primitives may
    /// be added.
    fn is_style_loaded(&self) -> bool;

    /// Registers a one-shot style-ready listener. When the style finishes
    /// loading, the embedding must deliver
    /// `SessionEvent::StyleReady(generation)` exactly once.
    fn once_style_ready(&mut self, generation: StyleGeneration);

    /// Requests a style change. Reloading drops every source and layer.
    fn set_style(&mut self, style_url: &str);

    fn add_control(&mut self, control: &Self::Control, anchor: Anchor);
    fn remove_control(&mut self, control: &Self::Control);

    fn has_source(&self, id: &str) -> bool;
    fn add_geojson_source(&mut self, id: &str, data: &RouteGeometry);
    /// Replaces the data of an existing GeoJSON source in place.
    fn set_source_data(&mut self, id: &str, data: &RouteGeometry);
    fn remove_source(&mut self, id: &str);

    fn has_layer(&self, id: &str) -> bool;
    fn add_line_layer(&mut self, layer: &LineLayer);
    fn remove_layer(&mut self, id: &str);

    /// Destroys the map instance. The engine is not used afterwards.
    fn destroy(&mut self);
}

/// The geolocation and directions add-ons.
///
/// `create` must wire the new control so that its events reach the session
/// tagged with `id`: "position acquired" as
/// `SessionEvent::PositionAcquired { source: id, .. }` and "route" as
/// `SessionEvent::RouteSelected { source: id, .. }`.
pub trait ControlBackend<E: MapEngine> {
    fn create(&mut self, kind: ControlKind, id: ControlId, config: &ViewConfig) -> E::Control;

    /// Asks a geolocation control to locate the user now.
    fn trigger_geolocation(&mut self, control: &E::Control);

    /// Sets the origin waypoint of a directions control.
    fn set_origin(&mut self, control: &E::Control, origin: LngLat);
}

// crates/routeview-core/src/sim/mod.rs

//! # In-Memory Engine
//!
//! A [`MapEngine`] and [`ControlBackend`] pair that keep their state in plain
//! collections and append every side effect to a shared [`Journal`]. It
//! behaves like the real engine where the session cares:
//!
//! - a fresh instance and every `set_style` start with the style *unloaded*;
//! - a style reload drops all sources and layers;
//! - style-ready subscriptions queue up until [`SimEngine::finish_style_load`];
//! - with [`SimEngine::set_tiles_pending`] the "style loaded" predicate stays
//!   false after the style-ready signal, as it does while tiles stream in;
//! - a directions control adds its own `directions` source and
//!   `directions-route` layer and leaves them behind when removed.
//!
//! ```rust
//! use routeview_core::sim;
//! use routeview_core::{ControlKind, Phase, ViewConfig};
//!
//! let (mut session, _journal) = sim::create_session(ViewConfig::default()).unwrap();
//! assert_eq!(session.phase(), Phase::Initializing);
//!
//! sim::complete_style_load(&mut session).unwrap();
//! assert_eq!(session.phase(), Phase::Ready);
//! assert_eq!(session.attached_kinds(), ControlKind::ALL.to_vec());
//! ```

pub mod script;

use crate::common::{Anchor, ControlId, ControlKind, LngLat, StyleGeneration};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::geometry::RouteGeometry;
use crate::overlay::LineLayer;
use crate::registry::{DIRECTIONS_INTERNAL_LAYER, DIRECTIONS_INTERNAL_SOURCE};
use crate::session::{MapSession, SessionEvent};
use crate::traits::{ControlBackend, MapEngine, MapOptions};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

pub type SimSession = MapSession<SimEngine, SimControls>;

// -----------------------------------------------------------------------------
// JOURNAL
// -----------------------------------------------------------------------------

/// One observable side effect on the engine or a control.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateMap { style_url: String, center: LngLat, zoom: f64 },
    SetStyle(String),
    OnceStyleReady(StyleGeneration),
    AddControl { id: ControlId, kind: ControlKind, anchor: Anchor },
    RemoveControl { id: ControlId, kind: ControlKind },
    AddSource(String),
    SetSourceData(String),
    RemoveSource(String),
    AddLayer(String),
    RemoveLayer(String),
    Destroy,
    CreateControl { id: ControlId, kind: ControlKind },
    TriggerGeolocation(ControlId),
    SetOrigin { id: ControlId, origin: LngLat },
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::CreateMap { style_url, center, zoom } => {
                write!(f, "map.create     style={style_url} center={center} zoom={zoom}")
            }
            Call::SetStyle(url) => write!(f, "map.setStyle   {url}"),
            Call::OnceStyleReady(g) => write!(f, "map.once       style.load -> {g}"),
            Call::AddControl { id, kind, anchor } => {
                write!(f, "map.addControl {kind} {id} @ {anchor}")
            }
            Call::RemoveControl { id, kind } => write!(f, "map.removeCtl  {kind} {id}"),
            Call::AddSource(id) => write!(f, "map.addSource  {id}"),
            Call::SetSourceData(id) => write!(f, "source.setData {id}"),
            Call::RemoveSource(id) => write!(f, "map.rmSource   {id}"),
            Call::AddLayer(id) => write!(f, "map.addLayer   {id}"),
            Call::RemoveLayer(id) => write!(f, "map.rmLayer    {id}"),
            Call::Destroy => write!(f, "map.remove"),
            Call::CreateControl { id, kind } => write!(f, "control.new    {kind} {id}"),
            Call::TriggerGeolocation(id) => write!(f, "geo.trigger    {id}"),
            Call::SetOrigin { id, origin } => write!(f, "dir.setOrigin  {id} {origin}"),
        }
    }
}

/// Shared, append-only log of [`Call`]s.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Calls recorded after `mark` (a previous [`Journal::len`]).
    pub fn calls_since(&self, mark: usize) -> Vec<Call> {
        self.0.borrow().get(mark..).map(<[Call]>::to_vec).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

// -----------------------------------------------------------------------------
// ENGINE
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimControl {
    pub id: ControlId,
    pub kind: ControlKind,
}

#[derive(Debug)]
pub struct SimEngine {
    journal: Journal,
    style_url: String,
    style_loaded: bool,
    tiles_pending: bool,
    pending: Vec<StyleGeneration>,
    controls: Vec<(SimControl, Anchor)>,
    // `None` data marks sources owned by a control rather than the session.
    sources: BTreeMap<String, Option<RouteGeometry>>,
    layers: BTreeSet<String>,
    destroyed: bool,
}

impl SimEngine {
    pub fn new(journal: Journal, options: &MapOptions) -> Self {
        journal.push(Call::CreateMap {
            style_url: options.style_url.clone(),
            center: options.viewport.center,
            zoom: options.viewport.zoom,
        });
        Self {
            journal,
            style_url: options.style_url.clone(),
            style_loaded: false,
            tiles_pending: false,
            pending: Vec::new(),
            controls: Vec::new(),
            sources: BTreeMap::new(),
            layers: BTreeSet::new(),
            destroyed: false,
        }
    }

    /// Marks the current style as loaded and hands back the generations of
    /// every queued style-ready subscription, oldest first.
    pub fn finish_style_load(&mut self) -> Vec<StyleGeneration> {
        self.style_loaded = true;
        std::mem::take(&mut self.pending)
    }

    /// Holds `is_style_loaded` at false regardless of the style load.
    pub fn set_tiles_pending(&mut self, pending: bool) {
        self.tiles_pending = pending;
    }

    pub fn style_url(&self) -> &str {
        &self.style_url
    }

    pub fn pending_subscriptions(&self) -> &[StyleGeneration] {
        &self.pending
    }

    pub fn control_count(&self, kind: ControlKind) -> usize {
        self.controls.iter().filter(|(c, _)| c.kind == kind).count()
    }

    /// Data of a session-owned GeoJSON source.
    pub fn source_data(&self, id: &str) -> Option<&RouteGeometry> {
        self.sources.get(id).and_then(Option::as_ref)
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(String::as_str).collect()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl MapEngine for SimEngine {
    type Control = SimControl;

    fn is_style_loaded(&self) -> bool {
        self.style_loaded && !self.tiles_pending
    }

    fn once_style_ready(&mut self, generation: StyleGeneration) {
        self.journal.push(Call::OnceStyleReady(generation));
        self.pending.push(generation);
    }

    fn set_style(&mut self, style_url: &str) {
        self.journal.push(Call::SetStyle(style_url.to_string()));
        self.style_url = style_url.to_string();
        self.style_loaded = false;
        self.sources.clear();
        self.layers.clear();
    }

    fn add_control(&mut self, control: &SimControl, anchor: Anchor) {
        self.journal.push(Call::AddControl {
            id: control.id,
            kind: control.kind,
            anchor,
        });
        self.controls.push((control.clone(), anchor));
        if control.kind == ControlKind::DirectionsPlanner {
            self.sources.insert(DIRECTIONS_INTERNAL_SOURCE.to_string(), None);
            self.layers.insert(DIRECTIONS_INTERNAL_LAYER.to_string());
        }
    }

    fn remove_control(&mut self, control: &SimControl) {
        self.journal.push(Call::RemoveControl {
            id: control.id,
            kind: control.kind,
        });
        self.controls.retain(|(c, _)| c.id != control.id);
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_geojson_source(&mut self, id: &str, data: &RouteGeometry) {
        self.journal.push(Call::AddSource(id.to_string()));
        self.sources.insert(id.to_string(), Some(data.clone()));
    }

    fn set_source_data(&mut self, id: &str, data: &RouteGeometry) {
        self.journal.push(Call::SetSourceData(id.to_string()));
        if let Some(slot) = self.sources.get_mut(id) {
            *slot = Some(data.clone());
        }
    }

    fn remove_source(&mut self, id: &str) {
        self.journal.push(Call::RemoveSource(id.to_string()));
        self.sources.remove(id);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.contains(id)
    }

    fn add_line_layer(&mut self, layer: &LineLayer) {
        self.journal.push(Call::AddLayer(layer.id.clone()));
        self.layers.insert(layer.id.clone());
    }

    fn remove_layer(&mut self, id: &str) {
        self.journal.push(Call::RemoveLayer(id.to_string()));
        self.layers.remove(id);
    }

    fn destroy(&mut self) {
        self.journal.push(Call::Destroy);
        self.destroyed = true;
        self.controls.clear();
        self.sources.clear();
        self.layers.clear();
        self.pending.clear();
    }
}

// -----------------------------------------------------------------------------
// CONTROLS
// -----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimControls {
    journal: Journal,
}

impl SimControls {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl ControlBackend<SimEngine> for SimControls {
    fn create(&mut self, kind: ControlKind, id: ControlId, _config: &ViewConfig) -> SimControl {
        self.journal.push(Call::CreateControl { id, kind });
        SimControl { id, kind }
    }

    fn trigger_geolocation(&mut self, control: &SimControl) {
        self.journal.push(Call::TriggerGeolocation(control.id));
    }

    fn set_origin(&mut self, control: &SimControl, origin: LngLat) {
        self.journal.push(Call::SetOrigin {
            id: control.id,
            origin,
        });
    }
}

// -----------------------------------------------------------------------------
// HELPERS
// -----------------------------------------------------------------------------

/// Creates a simulated session and returns it with its journal.
pub fn create_session(config: ViewConfig) -> Result<(SimSession, Journal)> {
    let journal = Journal::default();
    let backend = SimControls::new(journal.clone());
    let session = MapSession::create(
        config,
        |options: &MapOptions| SimEngine::new(journal.clone(), options),
        backend,
    )?;
    Ok((session, journal))
}

/// Finishes the engine's pending style load and delivers every queued
/// style-ready signal to the session, oldest first.
///
/// Returns how many signals were delivered.
pub fn complete_style_load(session: &mut SimSession) -> Result<usize> {
    let Some(engine) = session.engine_mut() else {
        return Ok(0);
    };
    let fired = engine.finish_style_load();
    let count = fired.len();
    for generation in fired {
        session.dispatch(SessionEvent::StyleReady(generation))?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Viewport;

    fn engine() -> (SimEngine, Journal) {
        let journal = Journal::default();
        let engine = SimEngine::new(
            journal.clone(),
            &MapOptions {
                style_url: "style://dark".to_string(),
                viewport: Viewport::default(),
            },
        );
        (engine, journal)
    }

    #[test]
    fn style_reload_drops_primitives_and_unloads() {
        let (mut engine, _) = engine();
        engine.finish_style_load();
        engine.add_geojson_source("route", &RouteGeometry::new(vec![LngLat::new(0.0, 0.0)]));
        engine.add_line_layer(&LineLayer::route());

        engine.set_style("style://light");

        assert_eq!(engine.style_url(), "style://light");
        assert!(!engine.is_style_loaded());
        assert!(engine.source_ids().is_empty());
        assert!(engine.layer_ids().is_empty());
    }

    #[test]
    fn pending_tiles_keep_the_style_unloaded() {
        let (mut engine, _) = engine();
        engine.once_style_ready(StyleGeneration(0));
        engine.set_tiles_pending(true);

        assert_eq!(engine.finish_style_load(), vec![StyleGeneration(0)]);
        assert!(!engine.is_style_loaded());

        engine.set_tiles_pending(false);
        assert!(engine.is_style_loaded());
    }

    #[test]
    fn destroy_forgets_everything() {
        let (mut engine, journal) = engine();
        engine.once_style_ready(StyleGeneration(0));
        engine.destroy();

        assert!(engine.is_destroyed());
        assert!(engine.pending_subscriptions().is_empty());
        assert_eq!(journal.calls().last(), Some(&Call::Destroy));
    }
}

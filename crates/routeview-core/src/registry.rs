// crates/routeview-core/src/registry.rs

//! # Control Registry
//!
//! Tracks which add-ons are attached to the live map, at most one per
//! [`ControlKind`]. Attach and detach are symmetric: whatever `attach` put on
//! the engine, `detach` takes off again, including the primitives the
//! directions control adds on its own and never removes.
//!
//! The two cross-control wires are routed here:
//!
//! - geolocation "position acquired" → directions `set_origin`
//! - directions "route" → the session's route store
//!
//! Each attach allocates a fresh [`ControlId`]. Events name the control that
//! produced them, so anything emitted by an instance that has since been
//! detached is dropped instead of reaching its successor.

use crate::common::{Anchor, ControlId, ControlKind, LngLat};
use crate::config::ViewConfig;
use crate::error::{InvariantViolation, Result};
use crate::traits::{ControlBackend, MapEngine};

/// Source the directions control creates for its own route preview.
pub const DIRECTIONS_INTERNAL_SOURCE: &str = "directions";
/// Layer the directions control creates for its own route preview.
pub const DIRECTIONS_INTERNAL_LAYER: &str = "directions-route";

/// One attached add-on.
pub struct ControlHandle<C> {
    pub kind: ControlKind,
    pub id: ControlId,
    pub anchor: Anchor,
    pub control: C,
}

pub struct ControlRegistry<E: MapEngine> {
    geolocation: Option<ControlHandle<E::Control>>,
    directions: Option<ControlHandle<E::Control>>,
    next_id: u64,
}

impl<E: MapEngine> Default for ControlRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: MapEngine> ControlRegistry<E> {
    pub fn new() -> Self {
        Self {
            geolocation: None,
            directions: None,
            next_id: 1,
        }
    }

    fn slot(&self, kind: ControlKind) -> &Option<ControlHandle<E::Control>> {
        match kind {
            ControlKind::Geolocation => &self.geolocation,
            ControlKind::DirectionsPlanner => &self.directions,
        }
    }

    fn slot_mut(&mut self, kind: ControlKind) -> &mut Option<ControlHandle<E::Control>> {
        match kind {
            ControlKind::Geolocation => &mut self.geolocation,
            ControlKind::DirectionsPlanner => &mut self.directions,
        }
    }

    pub fn handle(&self, kind: ControlKind) -> Option<&ControlHandle<E::Control>> {
        self.slot(kind).as_ref()
    }

    pub fn is_attached(&self, kind: ControlKind) -> bool {
        self.slot(kind).is_some()
    }

    pub fn control_id(&self, kind: ControlKind) -> Option<ControlId> {
        self.handle(kind).map(|h| h.id)
    }

    /// Attached kinds in attach order.
    pub fn attached_kinds(&self) -> Vec<ControlKind> {
        ControlKind::ALL
            .into_iter()
            .filter(|k| self.is_attached(*k))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.geolocation.is_none() && self.directions.is_none()
    }

    /// Builds a `kind` control through `backend` and places it on the engine.
    ///
    /// Attaching a kind that is already attached is a sequencing bug and is
    /// reported as [`InvariantViolation::DoubleAttach`]; nothing is created.
    pub fn attach<B: ControlBackend<E>>(
        &mut self,
        kind: ControlKind,
        engine: &mut E,
        backend: &mut B,
        config: &ViewConfig,
    ) -> Result<ControlId> {
        if let Some(existing) = self.slot(kind) {
            tracing::error!(%kind, id = %existing.id, "control attached twice");
            return Err(InvariantViolation::DoubleAttach(kind).into());
        }

        let id = ControlId(self.next_id);
        self.next_id += 1;
        let anchor = anchor_for(kind, config);

        let control = backend.create(kind, id, config);
        engine.add_control(&control, anchor);
        tracing::debug!(%kind, %id, %anchor, "control attached");

        *self.slot_mut(kind) = Some(ControlHandle {
            kind,
            id,
            anchor,
            control,
        });
        Ok(id)
    }

    /// Takes a `kind` control off the engine. Returns `false` if none was
    /// attached.
    pub fn detach(&mut self, kind: ControlKind, engine: &mut E) -> bool {
        let Some(handle) = self.slot_mut(kind).take() else {
            return false;
        };
        engine.remove_control(&handle.control);
        if kind == ControlKind::DirectionsPlanner {
            sweep_directions_primitives(engine);
        }
        tracing::debug!(%kind, id = %handle.id, "control detached");
        true
    }

    /// Detaches everything, then sweeps directions primitives that may have
    /// been left behind by an earlier instance.
    pub fn detach_all(&mut self, engine: &mut E) {
        for kind in ControlKind::ALL {
            self.detach(kind, engine);
        }
        sweep_directions_primitives(engine);
    }

    /// Forwards a geolocation fix to the directions control as its origin.
    ///
    /// Returns whether the origin was set. Fixes from a detached geolocation
    /// instance, or arriving while no directions control is attached, are
    /// dropped.
    pub fn route_position<B: ControlBackend<E>>(
        &self,
        source: ControlId,
        position: LngLat,
        backend: &mut B,
    ) -> bool {
        if self.control_id(ControlKind::Geolocation) != Some(source) {
            tracing::debug!(%source, "position from a detached geolocation control ignored");
            return false;
        }
        let Some(directions) = self.handle(ControlKind::DirectionsPlanner) else {
            tracing::debug!(%position, "no directions control attached; origin not set");
            return false;
        };
        backend.set_origin(&directions.control, position);
        tracing::debug!(%position, "directions origin set from geolocation");
        true
    }

    /// True when `source` is the attached directions control.
    pub fn accepts_route(&self, source: ControlId) -> bool {
        self.control_id(ControlKind::DirectionsPlanner) == Some(source)
    }

    /// Asks the attached geolocation control to locate the user.
    pub fn trigger_geolocation<B: ControlBackend<E>>(&self, backend: &mut B) -> bool {
        match self.handle(ControlKind::Geolocation) {
            Some(handle) => {
                backend.trigger_geolocation(&handle.control);
                true
            }
            None => false,
        }
    }
}

fn anchor_for(kind: ControlKind, config: &ViewConfig) -> Anchor {
    match kind {
        ControlKind::Geolocation => config.geolocate.anchor,
        ControlKind::DirectionsPlanner => config.directions.anchor,
    }
}

// Best effort: relies on the directions control's internal primitive names.
fn sweep_directions_primitives<E: MapEngine>(engine: &mut E) {
    if engine.has_layer(DIRECTIONS_INTERNAL_LAYER) {
        engine.remove_layer(DIRECTIONS_INTERNAL_LAYER);
    }
    if engine.has_source(DIRECTIONS_INTERNAL_SOURCE) {
        engine.remove_source(DIRECTIONS_INTERNAL_SOURCE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewError;
    use crate::sim::{Call, Journal, SimControls, SimEngine};
    use crate::traits::MapOptions;

    struct Rig {
        engine: SimEngine,
        backend: SimControls,
        journal: Journal,
        config: ViewConfig,
        registry: ControlRegistry<SimEngine>,
    }

    fn rig() -> Rig {
        let journal = Journal::default();
        let mut engine = SimEngine::new(
            journal.clone(),
            &MapOptions {
                style_url: "style://test".to_string(),
                viewport: Default::default(),
            },
        );
        engine.finish_style_load();
        Rig {
            engine,
            backend: SimControls::new(journal.clone()),
            journal,
            config: ViewConfig::default(),
            registry: ControlRegistry::new(),
        }
    }

    #[test]
    fn attaches_at_configured_anchors() {
        let mut r = rig();
        let geo = r
            .registry
            .attach(ControlKind::Geolocation, &mut r.engine, &mut r.backend, &r.config)
            .unwrap();
        let dir = r
            .registry
            .attach(ControlKind::DirectionsPlanner, &mut r.engine, &mut r.backend, &r.config)
            .unwrap();

        assert_ne!(geo, dir);
        assert_eq!(r.registry.attached_kinds(), ControlKind::ALL.to_vec());
        assert!(r.journal.calls().contains(&Call::AddControl {
            id: geo,
            kind: ControlKind::Geolocation,
            anchor: Anchor::TopRight,
        }));
        assert!(r.journal.calls().contains(&Call::AddControl {
            id: dir,
            kind: ControlKind::DirectionsPlanner,
            anchor: Anchor::TopLeft,
        }));
    }

    #[test]
    fn double_attach_is_reported() {
        let mut r = rig();
        r.registry
            .attach(ControlKind::Geolocation, &mut r.engine, &mut r.backend, &r.config)
            .unwrap();
        let before = r.journal.len();

        let err = r
            .registry
            .attach(ControlKind::Geolocation, &mut r.engine, &mut r.backend, &r.config)
            .unwrap_err();

        assert_eq!(
            err.invariant(),
            Some(InvariantViolation::DoubleAttach(ControlKind::Geolocation))
        );
        assert!(matches!(err, ViewError::Invariant(_)));
        assert_eq!(r.journal.len(), before, "no side effects on a rejected attach");
        assert_eq!(r.engine.control_count(ControlKind::Geolocation), 1);
    }

    #[test]
    fn detach_is_idempotent_and_sweeps_directions_leftovers() {
        let mut r = rig();
        r.registry
            .attach(ControlKind::DirectionsPlanner, &mut r.engine, &mut r.backend, &r.config)
            .unwrap();
        assert!(r.engine.has_layer(DIRECTIONS_INTERNAL_LAYER));

        assert!(r.registry.detach(ControlKind::DirectionsPlanner, &mut r.engine));
        assert!(!r.engine.has_layer(DIRECTIONS_INTERNAL_LAYER));
        assert!(!r.engine.has_source(DIRECTIONS_INTERNAL_SOURCE));

        let before = r.journal.len();
        assert!(!r.registry.detach(ControlKind::DirectionsPlanner, &mut r.engine));
        assert_eq!(r.journal.len(), before);
    }

    #[test]
    fn position_only_reaches_an_attached_planner() {
        let mut r = rig();
        let geo = r
            .registry
            .attach(ControlKind::Geolocation, &mut r.engine, &mut r.backend, &r.config)
            .unwrap();
        let here = LngLat::new(77.2, 28.6);

        assert!(!r.registry.route_position(geo, here, &mut r.backend));

        let dir = r
            .registry
            .attach(ControlKind::DirectionsPlanner, &mut r.engine, &mut r.backend, &r.config)
            .unwrap();
        assert!(r.registry.route_position(geo, here, &mut r.backend));
        assert!(r
            .journal
            .calls()
            .contains(&Call::SetOrigin { id: dir, origin: here }));
    }

    #[test]
    fn events_from_detached_instances_are_unbound() {
        let mut r = rig();
        let old_geo = r
            .registry
            .attach(ControlKind::Geolocation, &mut r.engine, &mut r.backend, &r.config)
            .unwrap();
        let old_dir = r
            .registry
            .attach(ControlKind::DirectionsPlanner, &mut r.engine, &mut r.backend, &r.config)
            .unwrap();
        r.registry.detach_all(&mut r.engine);
        assert!(r.registry.is_empty());

        for kind in ControlKind::ALL {
            r.registry
                .attach(kind, &mut r.engine, &mut r.backend, &r.config)
                .unwrap();
        }

        assert!(!r.registry.accepts_route(old_dir));
        assert!(!r
            .registry
            .route_position(old_geo, LngLat::new(0.0, 0.0), &mut r.backend));
        let new_dir = r.registry.control_id(ControlKind::DirectionsPlanner).unwrap();
        assert!(r.registry.accepts_route(new_dir));
    }
}

// crates/routeview-core/src/session.rs

//! # Session Controller
//!
//! Owns the map instance and sequences the [`ControlRegistry`] and the
//! [`RouteOverlayManager`] around the engine's asynchronous style loading.
//!
//! ```text
//!   create ──► Initializing ──style ready──► Ready ◄──style ready── StyleSwapping
//!                                              │                         ▲
//!                                              └──────── set_style ──────┘
//!   teardown (from any phase) ──► Closed
//! ```
//!
//! Waiting for a style is never a blocking call. The session registers a
//! one-shot style-ready subscription tagged with the current
//! [`StyleGeneration`]; every `set_style` bumps the generation, so a
//! subscription from a superseded request still fires but finds its
//! generation outdated and does nothing.
//!
//! The continuation for the current generation draws the stored route even
//! if the engine's "style loaded" predicate still lags behind. A route
//! selected while Ready but with that predicate false waits for one more
//! style-ready signal of the same generation.
//!
//! Every operation is a no-op once the instance is gone (before creation
//! is not representable; after [`MapSession::teardown`] it is `Closed`).

use crate::common::{ControlId, ControlKind, LngLat, Phase, Style, StyleGeneration, Viewport};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::geometry::{selected_geometry, RouteCandidate, RouteGeometry};
use crate::overlay::{ReadyProof, RouteOverlayManager};
use crate::registry::ControlRegistry;
use crate::store::OverlayStore;
use crate::traits::{ControlBackend, MapEngine, MapOptions};

/// Engine and control events, as delivered by the embedding.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A one-shot style-ready subscription fired.
    StyleReady(StyleGeneration),
    /// A geolocation control found the user.
    PositionAcquired { source: ControlId, position: LngLat },
    /// A directions control produced routes; only the first is used.
    RouteSelected {
        source: ControlId,
        routes: Vec<RouteCandidate>,
    },
}

pub struct MapSession<E: MapEngine, B: ControlBackend<E>> {
    config: ViewConfig,
    engine: Option<E>,
    backend: B,
    registry: ControlRegistry<E>,
    store: OverlayStore,
    overlay: RouteOverlayManager,
    style: Style,
    phase: Phase,
    generation: StyleGeneration,
    geolocation_triggered: bool,
    // A style-ready subscription for the current generation that only has
    // to redraw the route.
    redraw_pending: bool,
}

impl<E: MapEngine, B: ControlBackend<E>> MapSession<E, B> {
    /// Creates a session with the configured initial style and viewport.
    pub fn create(
        config: ViewConfig,
        build_engine: impl FnOnce(&MapOptions) -> E,
        backend: B,
    ) -> Result<Self> {
        let style = config.initial_style;
        let viewport = config.viewport;
        Self::create_with(config, style, viewport, build_engine, backend)
    }

    /// Builds the engine instance and waits for its first style.
    ///
    /// Controls are attached by the style-ready continuation, not here.
    pub fn create_with(
        config: ViewConfig,
        style: Style,
        viewport: Viewport,
        build_engine: impl FnOnce(&MapOptions) -> E,
        backend: B,
    ) -> Result<Self> {
        let options = MapOptions {
            style_url: config.style_url(style).to_string(),
            viewport,
        };
        let engine = build_engine(&options);
        tracing::info!(%style, center = %viewport.center, zoom = viewport.zoom, "map session created");

        let mut session = Self {
            config,
            engine: Some(engine),
            backend,
            registry: ControlRegistry::new(),
            store: OverlayStore::new(),
            overlay: RouteOverlayManager::new(),
            style,
            phase: Phase::Initializing,
            generation: StyleGeneration::default(),
            geolocation_triggered: false,
            redraw_pending: false,
        };
        session.await_style()?;
        Ok(session)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn generation(&self) -> StyleGeneration {
        self.generation
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    pub fn route(&self) -> Option<&RouteGeometry> {
        self.store.current()
    }

    pub fn attached_kinds(&self) -> Vec<ControlKind> {
        self.registry.attached_kinds()
    }

    pub fn control_id(&self, kind: ControlKind) -> Option<ControlId> {
        self.registry.control_id(kind)
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Direct engine access for embedding glue (e.g. pumping a simulated
    /// style load). Mutating session-owned primitives through it breaks the
    /// session's invariants.
    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True when the route overlay exists on the engine exactly when a route
    /// is stored and the session is Ready.
    pub fn overlay_consistent(&self) -> bool {
        let Some(engine) = self.engine.as_ref() else {
            return true;
        };
        let expected = self.phase == Phase::Ready && !self.store.is_empty();
        self.overlay.is_materialized(engine) == expected
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Switches to `style`, keeping the route across the reload.
    ///
    /// Controls are detached before the request is issued and re-attached by
    /// the continuation for this call's generation. Requesting the style that
    /// is already shown is a no-op; requesting the style that is still
    /// loading only supersedes the pending continuation.
    #[cfg(feature = "theme-toggle")]
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        let Some(engine) = self.engine.as_mut() else {
            tracing::debug!(%style, "set_style on a closed session ignored");
            return Ok(());
        };

        if style == self.style {
            if self.phase != Phase::StyleSwapping {
                tracing::debug!(%style, "style already active");
                return Ok(());
            }
            // Same target as the load in flight: no new request, but only the
            // newest caller's continuation may act.
            self.generation = self.generation.next();
            tracing::debug!(%style, generation = %self.generation, "pending style re-requested");
            return self.await_style();
        }

        self.registry.detach_all(engine);
        self.overlay.clear(engine);

        self.generation = self.generation.next();
        self.redraw_pending = false;
        self.style = style;
        engine.set_style(self.config.style_url(style));
        self.phase = Phase::StyleSwapping;
        tracing::info!(%style, generation = %self.generation, "style swap requested");

        self.await_style()
    }

    #[cfg(feature = "theme-toggle")]
    pub fn toggle_style(&mut self) -> Result<()> {
        self.set_style(self.style.toggled())
    }

    /// Stores a newly selected route and draws it if the session is Ready.
    /// Otherwise drawing waits for the next style-ready continuation.
    pub fn on_route_selected(&mut self, geometry: RouteGeometry) -> Result<()> {
        if self.engine.is_none() {
            tracing::debug!("route selected on a closed session ignored");
            return Ok(());
        }
        self.store.replace(geometry);
        self.draw_route(false)
    }

    /// Handles one engine or control event.
    pub fn dispatch(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::StyleReady(generation) => self.on_style_ready(generation),
            SessionEvent::PositionAcquired { source, position } => {
                if self.engine.is_some() {
                    self.registry
                        .route_position(source, position, &mut self.backend);
                }
                Ok(())
            }
            SessionEvent::RouteSelected { source, routes } => {
                if !self.registry.accepts_route(source) {
                    tracing::debug!(%source, "route from a detached directions control ignored");
                    return Ok(());
                }
                let Some(geometry) = selected_geometry(&routes) else {
                    tracing::debug!("route event without candidates ignored");
                    return Ok(());
                };
                tracing::info!(
                    points = geometry.len(),
                    distance_m = ?routes[0].distance,
                    alternatives = routes.len() - 1,
                    "route selected"
                );
                self.on_route_selected(geometry.clone())
            }
        }
    }

    /// Style-ready continuation. Acts only for the current generation.
    pub fn on_style_ready(&mut self, generation: StyleGeneration) -> Result<()> {
        if self.engine.is_none() {
            tracing::debug!(%generation, "style ready after teardown ignored");
            return Ok(());
        }
        if generation != self.generation {
            tracing::debug!(%generation, current = %self.generation, "stale style continuation discarded");
            return Ok(());
        }
        if self.phase == Phase::Ready {
            if !self.redraw_pending {
                tracing::debug!(%generation, "style continuation already ran");
                return Ok(());
            }
            self.redraw_pending = false;
            return self.draw_route(true);
        }
        self.complete_style_load()
    }

    /// Detaches every control and destroys the map instance. Idempotent.
    pub fn teardown(&mut self) {
        let Some(mut engine) = self.engine.take() else {
            return;
        };
        self.registry.detach_all(&mut engine);
        engine.destroy();
        self.store.clear();
        self.redraw_pending = false;
        self.phase = Phase::Closed;
        tracing::info!("map session torn down");
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Runs the continuation now if the style is already loaded, otherwise
    /// subscribes to the next style-ready signal.
    fn await_style(&mut self) -> Result<()> {
        let generation = self.generation;
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };
        if engine.is_style_loaded() {
            return self.complete_style_load();
        }
        engine.once_style_ready(generation);
        Ok(())
    }

    fn complete_style_load(&mut self) -> Result<()> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };
        for kind in ControlKind::ALL {
            self.registry
                .attach(kind, engine, &mut self.backend, &self.config)?;
        }
        self.phase = Phase::Ready;
        tracing::info!(style = %self.style, generation = %self.generation, "session ready");

        if !self.geolocation_triggered {
            self.geolocation_triggered = self.registry.trigger_geolocation(&mut self.backend);
        }
        // Running for the current generation is proof enough that the style
        // has loaded, whatever the engine's predicate says.
        self.draw_route(true)
    }

    /// Draws the stored route if the session is Ready.
    ///
    /// Unless a style-ready continuation vouches for the style
    /// (`style_confirmed`), an engine that still reports the style as loading
    /// gets a one-shot subscription for the current generation instead, and
    /// the route is drawn when it fires.
    fn draw_route(&mut self, style_confirmed: bool) -> Result<()> {
        if self.phase != Phase::Ready {
            return Ok(());
        }
        let (Some(engine), Some(route)) = (self.engine.as_mut(), self.store.current()) else {
            return Ok(());
        };

        let proof = if style_confirmed {
            ReadyProof::confirmed()
        } else if engine.is_style_loaded() {
            ReadyProof::new()
        } else {
            if !self.redraw_pending {
                engine.once_style_ready(self.generation);
                self.redraw_pending = true;
                tracing::debug!(generation = %self.generation, "style still loading; route drawn on next style-ready");
            }
            return Ok(());
        };
        self.overlay.materialize(engine, &proof, route)?;
        Ok(())
    }
}

impl<E: MapEngine, B: ControlBackend<E>> Drop for MapSession<E, B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LngLat;
    use crate::error::InvariantViolation;
    use crate::overlay::ROUTE_SOURCE_ID;
    use crate::sim::{self, Call, Journal, SimSession};

    fn route() -> RouteGeometry {
        RouteGeometry::new(vec![LngLat::new(77.2295, 28.6129), LngLat::new(77.1, 28.7)])
    }

    fn ready_session() -> (SimSession, Journal) {
        let (mut session, journal) = sim::create_session(ViewConfig::default()).unwrap();
        sim::complete_style_load(&mut session).unwrap();
        (session, journal)
    }

    #[test]
    fn initializing_until_first_style_load() {
        let (mut session, journal) = sim::create_session(ViewConfig::default()).unwrap();
        assert_eq!(session.phase(), Phase::Initializing);
        assert!(session.attached_kinds().is_empty());
        assert!(journal
            .calls()
            .contains(&Call::OnceStyleReady(StyleGeneration(0))));

        sim::complete_style_load(&mut session).unwrap();
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.attached_kinds(), ControlKind::ALL.to_vec());
    }

    #[test]
    fn route_before_ready_is_deferred() {
        let (mut session, _) = sim::create_session(ViewConfig::default()).unwrap();
        session.on_route_selected(route()).unwrap();
        assert!(!session.engine().unwrap().has_source(ROUTE_SOURCE_ID));
        assert!(session.overlay_consistent());

        sim::complete_style_load(&mut session).unwrap();
        assert_eq!(
            session.engine().unwrap().source_data(ROUTE_SOURCE_ID),
            Some(&route())
        );
        assert!(session.overlay_consistent());
    }

    #[test]
    fn duplicate_style_ready_for_the_same_generation_is_harmless() {
        let (mut session, _) = ready_session();
        session.on_style_ready(StyleGeneration(0)).unwrap();
        assert_eq!(session.attached_kinds(), ControlKind::ALL.to_vec());
        assert_eq!(
            session
                .engine()
                .unwrap()
                .control_count(ControlKind::Geolocation),
            1
        );
    }

    #[test]
    fn route_event_with_no_candidates_changes_nothing() {
        let (mut session, _) = ready_session();
        let source = session.control_id(ControlKind::DirectionsPlanner).unwrap();
        session
            .dispatch(SessionEvent::RouteSelected {
                source,
                routes: Vec::new(),
            })
            .unwrap();
        assert!(session.route().is_none());
    }

    #[test]
    fn operations_after_teardown_are_noops() {
        let (mut session, journal) = ready_session();
        session.teardown();
        let mark = journal.len();

        session.teardown();
        session.on_route_selected(route()).unwrap();
        session.on_style_ready(StyleGeneration(0)).unwrap();
        #[cfg(feature = "theme-toggle")]
        session.set_style(Style::Light).unwrap();

        assert_eq!(journal.len(), mark);
        assert_eq!(session.phase(), Phase::Closed);
        assert!(session.route().is_none());
    }

    #[test]
    fn teardown_detaches_then_destroys() {
        let (mut session, journal) = ready_session();
        let mark = journal.len();
        session.teardown();

        let calls = journal.calls_since(mark);
        assert_eq!(calls.last(), Some(&Call::Destroy));
        let removes = calls
            .iter()
            .filter(|c| matches!(c, Call::RemoveControl { .. }))
            .count();
        assert_eq!(removes, 2);
    }

    #[test]
    fn dropping_a_session_tears_it_down() {
        let (session, journal) = ready_session();
        drop(session);
        assert_eq!(journal.calls().last(), Some(&Call::Destroy));
    }

    #[test]
    fn loaded_style_runs_the_continuation_immediately() {
        let journal = Journal::default();
        let session = MapSession::create(
            ViewConfig::default(),
            |opts: &MapOptions| {
                let mut engine = sim::SimEngine::new(journal.clone(), opts);
                engine.finish_style_load();
                engine
            },
            sim::SimControls::new(journal.clone()),
        )
        .unwrap();
        assert_eq!(session.phase(), Phase::Ready);
        assert!(!journal
            .calls()
            .iter()
            .any(|c| matches!(c, Call::OnceStyleReady(_))));
    }

    #[cfg(feature = "theme-toggle")]
    #[test]
    fn same_style_is_a_noop_when_ready() {
        let (mut session, journal) = ready_session();
        let mark = journal.len();
        session.set_style(Style::Dark).unwrap();
        assert!(journal.calls_since(mark).is_empty());
        assert_eq!(session.generation(), StyleGeneration(0));
    }

    #[cfg(feature = "theme-toggle")]
    #[test]
    fn overlay_is_cleared_while_swapping() {
        let (mut session, _) = ready_session();
        session.on_route_selected(route()).unwrap();
        session.set_style(Style::Light).unwrap();

        assert_eq!(session.phase(), Phase::StyleSwapping);
        assert!(session.overlay_consistent());
        assert_eq!(session.route(), Some(&route()));
    }

    #[cfg(feature = "theme-toggle")]
    #[test]
    fn double_attach_surfaces_from_the_continuation() {
        let (mut session, _) = ready_session();
        session.set_style(Style::Light).unwrap();
        // Corrupt the sequencing on purpose: attach behind the session's back.
        let engine = session.engine.as_mut().unwrap();
        session
            .registry
            .attach(ControlKind::Geolocation, engine, &mut session.backend, &session.config)
            .unwrap();

        let err = sim::complete_style_load(&mut session).unwrap_err();
        assert_eq!(
            err.invariant(),
            Some(InvariantViolation::DoubleAttach(ControlKind::Geolocation))
        );
    }
}

// crates/routeview-wasm/src/dispatch.rs

//! Event queue between JS listeners and the session.
//!
//! JS callbacks hold a `Weak<Shared>` and only ever [`Shared::post`]. Events
//! are drained into the session one at a time, so a listener fired while the
//! session is busy (e.g. synchronously from inside `addControl`) is queued
//! instead of re-entering it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use routeview_core::{MapSession, SessionEvent, ViewError};
use wasm_bindgen::JsValue;

use crate::engine::{MapboxControls, MapboxEngine};

pub type Session = MapSession<MapboxEngine, MapboxControls>;

#[derive(Default)]
pub struct Shared {
    session: RefCell<Option<Session>>,
    queue: RefCell<VecDeque<SessionEvent>>,
}

impl Shared {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn install(&self, session: Session) {
        *self.session.borrow_mut() = Some(session);
        self.pump();
    }

    pub fn post(&self, event: SessionEvent) {
        self.queue.borrow_mut().push_back(event);
        self.pump();
    }

    /// Runs `f` against the session, then drains whatever it queued.
    ///
    /// Returns `None` when there is no session or it is already borrowed.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let out = {
            let mut slot = self.session.try_borrow_mut().ok()?;
            slot.as_mut().map(f)
        };
        self.pump();
        out
    }

    fn pump(&self) {
        loop {
            // Whoever holds the session drains the queue when it is done.
            let Ok(mut slot) = self.session.try_borrow_mut() else {
                return;
            };
            let Some(event) = self.queue.borrow_mut().pop_front() else {
                return;
            };
            let Some(session) = slot.as_mut() else {
                continue;
            };
            if let Err(e) = session.dispatch(event) {
                report(&e);
            }
        }
    }
}

/// Console level for an error coming out of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Sequencing bug in the session; `console.error`.
    Error,
    Warn,
}

pub fn severity(error: &ViewError) -> Severity {
    match error {
        ViewError::Invariant(_) => Severity::Error,
        _ => Severity::Warn,
    }
}

pub fn report(error: &ViewError) {
    let message = JsValue::from(format!("routeview: {error}"));
    match severity(error) {
        Severity::Error => web_sys::console::error_1(&message),
        Severity::Warn => web_sys::console::warn_1(&message),
    }
}

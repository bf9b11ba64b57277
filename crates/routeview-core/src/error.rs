// crates/routeview-core/src/error.rs

//! # Errors
//!
//! Only two kinds of failure leave this crate:
//!
//! - [`InvariantViolation`]: a sequencing bug in the controller (double
//!   attach, overlay materialized before the style is loaded). These are
//!   programming errors and are reported, never swallowed.
//! - Loading problems for [`crate::config::ViewConfig`] and scenario scripts
//!   (I/O, JSON, validation).
//!
//! Stale style-ready continuations and calls made outside the session's
//! active window are *not* errors; they resolve to `Ok(())`.

use crate::common::ControlKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewError>;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A controller sequencing bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A second control of the same kind was attached; the engine's control
    /// list would hold two instances.
    #[error("a {0} control is already attached")]
    DoubleAttach(ControlKind),

    /// The route overlay was about to be added to an engine whose style has
    /// not finished loading.
    #[error("route overlay materialized while the engine style is not loaded")]
    StyleNotLoaded,
}

impl ViewError {
    /// Returns the invariant behind this error, if it is one.
    pub fn invariant(&self) -> Option<InvariantViolation> {
        match self {
            ViewError::Invariant(v) => Some(*v),
            _ => None,
        }
    }
}

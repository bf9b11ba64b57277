//! routeview-rs
//!
//! Workspace crate hosting the demos. Re-exports `routeview-core` so the
//! demos read the same as downstream code would.

pub use routeview_core::*;

//! routeview-cli
//! =============
//!
//! Command-line driver for `routeview-core` map sessions.
//!
//! This crate primarily provides a binary (`routeview`). We include a small
//! library target so that docs.rs renders a documentation page and shows this
//! overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! routeview --help
//! routeview demo
//! routeview --verbose run scenario.json
//! routeview --config view.json config
//! ```
//!
//! Scenarios run against the in-memory engine of `routeview_core::sim`; the
//! printed journal lists every engine and control call in order.
//!
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the primary
// deliverable.

// crates/routeview-core/src/store.rs

use crate::geometry::RouteGeometry;

/// Holds the last selected route, if any.
///
/// The store is plain data. It survives style swaps and is only emptied when
/// the session ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayStore {
    route: Option<RouteGeometry>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self { route: None }
    }

    /// Stores `route`, dropping the previous one. Returns the replaced route.
    pub fn replace(&mut self, route: RouteGeometry) -> Option<RouteGeometry> {
        self.route.replace(route)
    }

    pub fn current(&self) -> Option<&RouteGeometry> {
        self.route.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_none()
    }

    pub fn clear(&mut self) {
        self.route = None;
    }
}

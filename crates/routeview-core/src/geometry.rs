// crates/routeview-core/src/geometry.rs

//! Route geometry as produced by the directions control.
//!
//! On the wire a route is a GeoJSON `LineString`; in memory it is an ordered,
//! immutable list of [`LngLat`] points. A new selection replaces the previous
//! geometry wholesale.

use crate::common::LngLat;
use serde::{Deserialize, Serialize};

/// A line-shaped path, first point to last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonLine", into = "GeoJsonLine")]
pub struct RouteGeometry {
    coordinates: Vec<LngLat>,
}

impl RouteGeometry {
    pub fn new(coordinates: Vec<LngLat>) -> Self {
        Self { coordinates }
    }

    pub fn coordinates(&self) -> &[LngLat] {
        &self.coordinates
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn start(&self) -> Option<LngLat> {
        self.coordinates.first().copied()
    }

    pub fn end(&self) -> Option<LngLat> {
        self.coordinates.last().copied()
    }
}

impl FromIterator<LngLat> for RouteGeometry {
    fn from_iter<I: IntoIterator<Item = LngLat>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// GeoJSON representation: {"type": "LineString", "coordinates": [[lng, lat], ...]}
#[derive(Serialize, Deserialize)]
struct GeoJsonLine {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<LngLat>,
}

impl TryFrom<GeoJsonLine> for RouteGeometry {
    type Error = String;

    fn try_from(raw: GeoJsonLine) -> Result<Self, Self::Error> {
        if raw.kind != "LineString" {
            return Err(format!("expected a LineString geometry, got {:?}", raw.kind));
        }
        Ok(Self::new(raw.coordinates))
    }
}

impl From<RouteGeometry> for GeoJsonLine {
    fn from(g: RouteGeometry) -> Self {
        Self {
            kind: "LineString".to_string(),
            coordinates: g.coordinates,
        }
    }
}

/// One alternative offered in a directions "route" event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub geometry: RouteGeometry,
    /// Metres.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl RouteCandidate {
    pub fn new(geometry: RouteGeometry) -> Self {
        Self {
            geometry,
            distance: None,
            duration: None,
        }
    }
}

/// Picks the geometry the session keeps from a route event: the first
/// candidate, or nothing when the event carries none.
pub fn selected_geometry(candidates: &[RouteCandidate]) -> Option<&RouteGeometry> {
    candidates.first().map(|c| &c.geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> RouteGeometry {
        RouteGeometry::new(vec![
            LngLat::new(77.2295, 28.6129),
            LngLat::new(77.21, 28.63),
        ])
    }

    #[test]
    fn serializes_as_geojson_linestring() {
        let json = serde_json::to_value(line()).unwrap();
        assert_eq!(json["type"], "LineString");
        assert_eq!(json["coordinates"][1][0], 77.21);
    }

    #[test]
    fn rejects_other_geometry_types() {
        let err = serde_json::from_str::<RouteGeometry>(
            r#"{"type":"Point","coordinates":[[0.0,0.0]]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn candidate_ignores_unknown_fields() {
        let c: RouteCandidate = serde_json::from_str(
            r#"{"geometry":{"type":"LineString","coordinates":[[1,2],[3,4]]},
                "distance":1200.5,"legs":[],"weight_name":"auto"}"#,
        )
        .unwrap();
        assert_eq!(c.geometry.len(), 2);
        assert_eq!(c.distance, Some(1200.5));
        assert_eq!(c.duration, None);
    }

    #[test]
    fn endpoints_follow_coordinate_order() {
        assert_eq!(line().start(), Some(LngLat::new(77.2295, 28.6129)));
        assert_eq!(line().end(), Some(LngLat::new(77.21, 28.63)));
        let empty = RouteGeometry::new(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.start(), None);
    }

    #[test]
    fn only_first_candidate_is_selected() {
        let other = RouteGeometry::new(vec![LngLat::new(0.0, 0.0)]);
        let candidates = vec![RouteCandidate::new(line()), RouteCandidate::new(other)];
        assert_eq!(selected_geometry(&candidates), Some(&line()));
        assert_eq!(selected_geometry(&[]), None);
    }
}

// crates/routeview-core/src/common.rs

//! Small value types shared by every layer of the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// -----------------------------------------------------------------------------
// COORDINATES
// -----------------------------------------------------------------------------

/// A longitude/latitude pair in degrees.
///
/// Serialized in GeoJSON position order: `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lng, p.lat]
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lng, self.lat)
    }
}

/// Initial camera of a new session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LngLat,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: LngLat::new(77.2295, 28.6129),
            zoom: 9.0,
        }
    }
}

// -----------------------------------------------------------------------------
// STYLE
// -----------------------------------------------------------------------------

/// The two visual themes a session can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Light,
    Dark,
}

impl Style {
    pub fn toggled(self) -> Self {
        match self {
            Style::Light => Style::Dark,
            Style::Dark => Style::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Light => "light",
            Style::Dark => "dark",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a theme name is neither `light` nor `dark`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style {0:?} (expected \"light\" or \"dark\")")]
pub struct UnknownStyle(pub String);

impl FromStr for Style {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Style::Light),
            "dark" => Ok(Style::Dark),
            _ => Err(UnknownStyle(s.to_string())),
        }
    }
}

/// Monotonic counter distinguishing successive style requests.
///
/// A style-ready continuation captures the generation current at the time it
/// was registered and only acts if it still matches when the signal fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct StyleGeneration(pub u64);

impl StyleGeneration {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StyleGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// SESSION PHASE
// -----------------------------------------------------------------------------

/// Readiness of a map session.
///
/// `Ready` is the only interactive phase. `Initializing` and `StyleSwapping`
/// wait for a style-ready signal; `Closed` follows teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Initializing,
    Ready,
    StyleSwapping,
    Closed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Initializing => "initializing",
            Phase::Ready => "ready",
            Phase::StyleSwapping => "style_swapping",
            Phase::Closed => "closed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// CONTROLS
// -----------------------------------------------------------------------------

/// The add-ons a session keeps attached while it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Geolocation,
    DirectionsPlanner,
}

impl ControlKind {
    /// Every kind, in attach order.
    pub const ALL: [ControlKind; 2] = [ControlKind::Geolocation, ControlKind::DirectionsPlanner];
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlKind::Geolocation => f.write_str("geolocation"),
            ControlKind::DirectionsPlanner => f.write_str("directions"),
        }
    }
}

/// Identity of one live control instance. Events carry it back so that a
/// control that has since been detached can be told apart from its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlId(pub u64);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctl#{}", self.0)
    }
}

/// Named screen corner a control is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// The position string the rendering engine expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopRight => "top-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_parses_case_insensitively() {
        assert_eq!("Dark".parse::<Style>(), Ok(Style::Dark));
        assert_eq!(" light ".parse::<Style>(), Ok(Style::Light));
        assert!("sepia".parse::<Style>().is_err());
    }

    #[test]
    fn toggled_flips_between_the_two_themes() {
        assert_eq!(Style::Dark.toggled(), Style::Light);
        assert_eq!(Style::Light.toggled().toggled(), Style::Light);
    }

    #[test]
    fn lnglat_serializes_in_geojson_order() {
        let p = LngLat::new(77.2295, 28.6129);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[77.2295,28.6129]");
        let back: LngLat = serde_json::from_str("[1.5,-2.0]").unwrap();
        assert_eq!(back, LngLat::new(1.5, -2.0));
    }

    #[test]
    fn lnglat_range_check() {
        assert!(LngLat::new(-180.0, 90.0).is_valid());
        assert!(!LngLat::new(181.0, 0.0).is_valid());
        assert!(!LngLat::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn anchor_uses_engine_position_names() {
        assert_eq!(Anchor::TopRight.as_str(), "top-right");
        assert_eq!(
            serde_json::to_string(&Anchor::BottomLeft).unwrap(),
            "\"bottom-left\""
        );
    }
}

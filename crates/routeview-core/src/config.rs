// crates/routeview-core/src/config.rs

//! # View Configuration
//!
//! Everything about a session that is a constant in a typical deployment:
//! style URLs, the initial camera, and the options handed to the geolocation
//! and directions controls. Every field has a default, so a JSON file only
//! needs to list what it overrides:
//!
//! ```rust
//! use routeview_core::config::ViewConfig;
//! use routeview_core::Style;
//!
//! let cfg = ViewConfig::from_json_str(r#"{ "initial_style": "light" }"#).unwrap();
//! assert_eq!(cfg.initial_style, Style::Light);
//! assert_eq!(cfg.viewport.zoom, 9.0);
//! ```

use crate::common::{Anchor, Style, Viewport};
use crate::error::{Result, ViewError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LIGHT_STYLE: &str = "mapbox://styles/mapbox/navigation-guidance-day-v4";
pub const DEFAULT_DARK_STYLE: &str = "mapbox://styles/mapbox/navigation-guidance-night-v4";

/// Highest zoom level the engine accepts.
pub const MAX_ZOOM: f64 = 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleUrls {
    pub light: String,
    pub dark: String,
}

impl StyleUrls {
    pub fn url(&self, style: Style) -> &str {
        match style {
            Style::Light => &self.light,
            Style::Dark => &self.dark,
        }
    }
}

impl Default for StyleUrls {
    fn default() -> Self {
        Self {
            light: DEFAULT_LIGHT_STYLE.to_string(),
            dark: DEFAULT_DARK_STYLE.to_string(),
        }
    }
}

/// Options for the geolocation control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocateOptions {
    pub enable_high_accuracy: bool,
    pub track_user_location: bool,
    pub show_user_location: bool,
    pub anchor: Anchor,
}

impl Default for GeolocateOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            track_user_location: true,
            show_user_location: true,
            anchor: Anchor::TopRight,
        }
    }
}

/// Options for the directions-planning control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsOptions {
    /// `metric` or `imperial`.
    pub unit: String,
    /// Routing profile, e.g. `mapbox/driving`.
    pub profile: String,
    /// Whether clicking the map sets waypoints.
    pub interactive: bool,
    pub anchor: Anchor,
}

impl Default for DirectionsOptions {
    fn default() -> Self {
        Self {
            unit: "metric".to_string(),
            profile: "mapbox/driving".to_string(),
            interactive: false,
            anchor: Anchor::TopLeft,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub styles: StyleUrls,
    pub initial_style: Style,
    pub viewport: Viewport,
    pub geolocate: GeolocateOptions,
    pub directions: DirectionsOptions,
    /// Token handed to the directions control. Kept out of `Debug` output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            styles: StyleUrls::default(),
            initial_style: Style::Dark,
            viewport: Viewport::default(),
            geolocate: GeolocateOptions::default(),
            directions: DirectionsOptions::default(),
            access_token: None,
        }
    }
}

impl std::fmt::Debug for ViewConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewConfig")
            .field("styles", &self.styles)
            .field("initial_style", &self.initial_style)
            .field("viewport", &self.viewport)
            .field("geolocate", &self.geolocate)
            .field("directions", &self.directions)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ViewConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: ViewConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ViewError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn style_url(&self, style: Style) -> &str {
        self.styles.url(style)
    }

    /// Rejects values the engine would refuse or silently clamp.
    pub fn validate(&self) -> Result<()> {
        if !self.viewport.center.is_valid() {
            return Err(ViewError::Config(format!(
                "viewport center {} is outside the WGS84 range",
                self.viewport.center
            )));
        }
        let zoom = self.viewport.zoom;
        if !zoom.is_finite() || !(0.0..=MAX_ZOOM).contains(&zoom) {
            return Err(ViewError::Config(format!(
                "zoom {zoom} is outside 0..={MAX_ZOOM}"
            )));
        }
        for style in [Style::Light, Style::Dark] {
            if self.style_url(style).trim().is_empty() {
                return Err(ViewError::Config(format!("style URL for {style} is empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LngLat;

    #[test]
    fn defaults_match_the_navigation_view() {
        let cfg = ViewConfig::default();
        assert_eq!(cfg.initial_style, Style::Dark);
        assert_eq!(cfg.viewport.center, LngLat::new(77.2295, 28.6129));
        assert_eq!(cfg.style_url(Style::Dark), DEFAULT_DARK_STYLE);
        assert_eq!(cfg.directions.profile, "mapbox/driving");
        assert!(!cfg.directions.interactive);
        assert_eq!(cfg.geolocate.anchor, Anchor::TopRight);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ViewConfig::from_json_str(
            r#"{"viewport":{"center":[2.35,48.85],"zoom":12},"directions":{"unit":"imperial"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.viewport.center, LngLat::new(2.35, 48.85));
        assert_eq!(cfg.directions.unit, "imperial");
        assert_eq!(cfg.directions.profile, "mapbox/driving");
        assert_eq!(cfg.initial_style, Style::Dark);
    }

    #[test]
    fn rejects_out_of_range_viewport() {
        let err = ViewConfig::from_json_str(r#"{"viewport":{"center":[0,95],"zoom":3}}"#);
        assert!(matches!(err, Err(ViewError::Config(_))));
        let err = ViewConfig::from_json_str(r#"{"viewport":{"center":[0,0],"zoom":30}}"#);
        assert!(matches!(err, Err(ViewError::Config(_))));
    }

    #[test]
    fn rejects_empty_style_url() {
        let err = ViewConfig::from_json_str(r#"{"styles":{"light":"  "}}"#);
        assert!(matches!(err, Err(ViewError::Config(_))));
    }

    #[test]
    fn debug_output_hides_the_token() {
        let cfg = ViewConfig {
            access_token: Some("pk.secret".to_string()),
            ..ViewConfig::default()
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("pk.secret"));
        assert!(dbg.contains("<redacted>"));
    }
}

// crates/routeview-wasm/src/options.rs

//! Option objects handed to the JS constructors, and the small amount of
//! event-payload decoding the session needs.

use routeview_core::config::ViewConfig;
use routeview_core::{LngLat, MapOptions, RouteCandidate};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

#[derive(Debug, Serialize)]
pub struct MapJs<'a> {
    pub container: &'a str,
    pub style: &'a str,
    pub center: LngLat,
    pub zoom: f64,
}

impl<'a> MapJs<'a> {
    pub fn new(container: &'a str, options: &'a MapOptions) -> Self {
        Self {
            container,
            style: &options.style_url,
            center: options.viewport.center,
            zoom: options.viewport.zoom,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionOptionsJs {
    pub enable_high_accuracy: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocateJs {
    pub position_options: PositionOptionsJs,
    pub track_user_location: bool,
    pub show_user_location: bool,
}

impl GeolocateJs {
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            position_options: PositionOptionsJs {
                enable_high_accuracy: config.geolocate.enable_high_accuracy,
            },
            track_user_location: config.geolocate.track_user_location,
            show_user_location: config.geolocate.show_user_location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsJs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub unit: &'a str,
    pub profile: &'a str,
    pub interactive: bool,
}

impl<'a> DirectionsJs<'a> {
    /// Falls back to the page-wide `mapboxgl.accessToken` when the config
    /// carries no token.
    pub fn from_config(config: &'a ViewConfig, page_token: Option<String>) -> Self {
        Self {
            access_token: config.access_token.clone().or(page_token),
            unit: &config.directions.unit,
            profile: &config.directions.profile,
            interactive: config.directions.interactive,
        }
    }
}

/// Serializes to plain JS objects/arrays (not `Map`s).
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match value.serialize(&Serializer::json_compatible()) {
        Ok(v) => v,
        Err(e) => {
            web_sys::console::error_1(&format!("routeview: cannot serialize value: {e}").into());
            JsValue::UNDEFINED
        }
    }
}

/// Reads `event.coords.{longitude,latitude}` from a geolocate event.
pub fn position_from_event(event: &JsValue) -> Option<LngLat> {
    let coords = js_sys::Reflect::get(event, &"coords".into()).ok()?;
    let lng = js_sys::Reflect::get(&coords, &"longitude".into()).ok()?.as_f64()?;
    let lat = js_sys::Reflect::get(&coords, &"latitude".into()).ok()?.as_f64()?;
    Some(LngLat::new(lng, lat))
}

/// Reads `event.route` from a directions "route" event.
pub fn routes_from_event(event: &JsValue) -> Option<Vec<RouteCandidate>> {
    let routes = js_sys::Reflect::get(event, &"route".into()).ok()?;
    if routes.is_undefined() || routes.is_null() {
        return None;
    }
    match serde_wasm_bindgen::from_value(routes) {
        Ok(routes) => Some(routes),
        Err(e) => {
            web_sys::console::warn_1(&format!("routeview: unreadable route event: {e}").into());
            None
        }
    }
}

/// `mapboxgl.accessToken`, if the page set one.
pub fn page_access_token() -> Option<String> {
    let mapboxgl = js_sys::Reflect::get(&js_sys::global(), &"mapboxgl".into()).ok()?;
    js_sys::Reflect::get(&mapboxgl, &"accessToken".into())
        .ok()?
        .as_string()
}

/// Sets `mapboxgl.accessToken`.
pub fn set_page_access_token(token: &str) {
    let Ok(mapboxgl) = js_sys::Reflect::get(&js_sys::global(), &"mapboxgl".into()) else {
        return;
    };
    if js_sys::Reflect::set(&mapboxgl, &"accessToken".into(), &token.into()).is_err() {
        web_sys::console::warn_1(&"routeview: could not set mapboxgl.accessToken".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeview_core::Viewport;

    #[test]
    fn map_options_use_engine_field_names() {
        let options = MapOptions {
            style_url: "mapbox://styles/mapbox/navigation-guidance-night-v4".to_string(),
            viewport: Viewport::default(),
        };
        let json = serde_json::to_value(MapJs::new("map", &options)).unwrap();
        assert_eq!(json["container"], "map");
        assert_eq!(json["center"][0], 77.2295);
        assert_eq!(json["zoom"], 9.0);
    }

    #[test]
    fn geolocate_options_are_camel_case() {
        let json = serde_json::to_value(GeolocateJs::from_config(&ViewConfig::default())).unwrap();
        assert_eq!(json["positionOptions"]["enableHighAccuracy"], true);
        assert_eq!(json["trackUserLocation"], true);
        assert_eq!(json["showUserLocation"], true);
    }

    #[test]
    fn directions_token_prefers_config() {
        let mut cfg = ViewConfig::default();
        let json = serde_json::to_value(DirectionsJs::from_config(&cfg, None)).unwrap();
        assert!(json.get("accessToken").is_none());
        assert_eq!(json["profile"], "mapbox/driving");
        assert_eq!(json["interactive"], false);

        cfg.access_token = Some("pk.config".to_string());
        let json =
            serde_json::to_value(DirectionsJs::from_config(&cfg, Some("pk.page".to_string())))
                .unwrap();
        assert_eq!(json["accessToken"], "pk.config");
    }
}

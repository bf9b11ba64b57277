// crates/routeview-wasm/src/bindings.rs

//! Imports of the Mapbox GL JS API and the Mapbox directions plugin.
//!
//! Both are expected as page globals (`mapboxgl`, `MapboxDirections`), i.e.
//! loaded from their CDN bundles or assigned to `window` by the bundler.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /* ----------------------------------------------------------------------
       mapboxgl.Map
    ---------------------------------------------------------------------- */

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    pub type MapboxMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map")]
    pub fn new(options: &JsValue) -> MapboxMap;

    #[wasm_bindgen(method, js_name = isStyleLoaded)]
    pub fn is_style_loaded(this: &MapboxMap) -> bool;

    #[wasm_bindgen(method, js_name = setStyle)]
    pub fn set_style(this: &MapboxMap, style: &str);

    #[wasm_bindgen(method)]
    pub fn once(this: &MapboxMap, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = addControl)]
    pub fn add_control(this: &MapboxMap, control: &JsValue, position: &str);

    #[wasm_bindgen(method, js_name = removeControl)]
    pub fn remove_control(this: &MapboxMap, control: &JsValue);

    /// `undefined` when no such source exists.
    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addSource)]
    pub fn add_source(this: &MapboxMap, id: &str, source: &JsValue);

    #[wasm_bindgen(method, js_name = removeSource)]
    pub fn remove_source(this: &MapboxMap, id: &str);

    /// `undefined` when no such layer exists.
    #[wasm_bindgen(method, js_name = getLayer)]
    pub fn get_layer(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &MapboxMap, layer: &JsValue);

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &MapboxMap, id: &str);

    #[wasm_bindgen(method)]
    pub fn remove(this: &MapboxMap);

    /* ----------------------------------------------------------------------
       GeoJSON source (as returned by getSource)
    ---------------------------------------------------------------------- */

    pub type GeoJsonSource;

    #[wasm_bindgen(method, js_name = setData)]
    pub fn set_data(this: &GeoJsonSource, data: &JsValue);

    /* ----------------------------------------------------------------------
       mapboxgl.GeolocateControl
    ---------------------------------------------------------------------- */

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = GeolocateControl)]
    pub type GeolocateControl;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "GeolocateControl")]
    pub fn new(options: &JsValue) -> GeolocateControl;

    #[wasm_bindgen(method)]
    pub fn trigger(this: &GeolocateControl) -> bool;

    #[wasm_bindgen(method)]
    pub fn on(this: &GeolocateControl, event: &str, listener: &js_sys::Function);

    /* ----------------------------------------------------------------------
       MapboxDirections (directions plugin)
    ---------------------------------------------------------------------- */

    pub type MapboxDirections;

    #[wasm_bindgen(constructor)]
    pub fn new(options: &JsValue) -> MapboxDirections;

    #[wasm_bindgen(method, js_name = setOrigin)]
    pub fn set_origin(this: &MapboxDirections, origin: &JsValue);

    #[wasm_bindgen(method)]
    pub fn on(this: &MapboxDirections, event: &str, listener: &js_sys::Function);
}

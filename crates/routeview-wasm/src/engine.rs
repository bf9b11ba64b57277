// crates/routeview-wasm/src/engine.rs

//! [`MapEngine`] and [`ControlBackend`] on top of Mapbox GL JS.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use routeview_core::{
    Anchor, ControlBackend, ControlId, ControlKind, LineLayer, LngLat, MapEngine, MapOptions,
    RouteGeometry, SessionEvent, StyleGeneration, ViewConfig,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::bindings::{GeoJsonSource, GeolocateControl, MapboxDirections, MapboxMap};
use crate::dispatch::Shared;
use crate::options::{
    page_access_token, position_from_event, routes_from_event, to_js, DirectionsJs, GeolocateJs,
    MapJs,
};

const STYLE_LOAD_EVENT: &str = "style.load";
// Fires once sources and tiles have settled, i.e. when `isStyleLoaded()`
// turns true for a style whose `style.load` has already fired.
const IDLE_EVENT: &str = "idle";

#[derive(Serialize)]
struct GeoJsonSourceJs<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a RouteGeometry,
}

fn post(shared: &Weak<Shared>, event: SessionEvent) {
    // A dropped view leaves its listeners behind; they go quiet here.
    if let Some(shared) = shared.upgrade() {
        shared.post(event);
    }
}

/* --------------------------------------------------------------------------
   Controls
-------------------------------------------------------------------------- */

pub enum MapboxControl {
    Geolocate {
        id: ControlId,
        control: GeolocateControl,
    },
    Directions {
        id: ControlId,
        control: MapboxDirections,
    },
}

impl MapboxControl {
    fn as_js(&self) -> &JsValue {
        match self {
            MapboxControl::Geolocate { control, .. } => control,
            MapboxControl::Directions { control, .. } => control,
        }
    }
}

pub struct MapboxControls {
    shared: Weak<Shared>,
}

impl MapboxControls {
    pub fn new(shared: Weak<Shared>) -> Self {
        Self { shared }
    }

    fn geolocate(&self, id: ControlId, config: &ViewConfig) -> GeolocateControl {
        let control = GeolocateControl::new(&to_js(&GeolocateJs::from_config(config)));

        let shared = self.shared.clone();
        let on_fix = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match position_from_event(&event) {
                Some(position) => post(&shared, SessionEvent::PositionAcquired { source: id, position }),
                None => web_sys::console::warn_1(&"routeview: geolocate event without coords".into()),
            }
        });
        control.on("geolocate", on_fix.into_js_value().unchecked_ref());

        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            web_sys::console::warn_2(&format!("routeview: geolocation failed on {id}").into(), &event);
        });
        control.on("error", on_error.into_js_value().unchecked_ref());

        control
    }

    fn directions(&self, id: ControlId, config: &ViewConfig) -> MapboxDirections {
        let options = DirectionsJs::from_config(config, page_access_token());
        let control = MapboxDirections::new(&to_js(&options));

        let shared = self.shared.clone();
        let on_route = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            if let Some(routes) = routes_from_event(&event) {
                post(&shared, SessionEvent::RouteSelected { source: id, routes });
            }
        });
        control.on("route", on_route.into_js_value().unchecked_ref());

        control
    }
}

impl ControlBackend<MapboxEngine> for MapboxControls {
    fn create(&mut self, kind: ControlKind, id: ControlId, config: &ViewConfig) -> MapboxControl {
        match kind {
            ControlKind::Geolocation => MapboxControl::Geolocate {
                id,
                control: self.geolocate(id, config),
            },
            ControlKind::DirectionsPlanner => MapboxControl::Directions {
                id,
                control: self.directions(id, config),
            },
        }
    }

    fn trigger_geolocation(&mut self, control: &MapboxControl) {
        if let MapboxControl::Geolocate { control, id } = control {
            if !control.trigger() {
                web_sys::console::warn_1(&format!("routeview: {id} not ready to locate").into());
            }
        }
    }

    fn set_origin(&mut self, control: &MapboxControl, origin: LngLat) {
        if let MapboxControl::Directions { control, .. } = control {
            control.set_origin(&to_js(&origin));
        }
    }
}

/* --------------------------------------------------------------------------
   Map
-------------------------------------------------------------------------- */

pub struct MapboxEngine {
    map: MapboxMap,
    shared: Weak<Shared>,
    // True from a style request until its `style.load` fires.
    style_requested: Rc<Cell<bool>>,
}

impl MapboxEngine {
    pub fn new(container: &str, options: &MapOptions, shared: Weak<Shared>) -> Self {
        let map = MapboxMap::new(&to_js(&MapJs::new(container, options)));
        Self {
            map,
            shared,
            style_requested: Rc::new(Cell::new(true)),
        }
    }
}

impl MapEngine for MapboxEngine {
    type Control = MapboxControl;

    fn is_style_loaded(&self) -> bool {
        self.map.is_style_loaded()
    }

    fn once_style_ready(&mut self, generation: StyleGeneration) {
        let event = if self.style_requested.get() {
            STYLE_LOAD_EVENT
        } else {
            IDLE_EVENT
        };
        let shared = self.shared.clone();
        let requested = Rc::clone(&self.style_requested);
        let listener = Closure::once_into_js(move || {
            if event == STYLE_LOAD_EVENT {
                requested.set(false);
            }
            post(&shared, SessionEvent::StyleReady(generation));
        });
        self.map.once(event, listener.unchecked_ref());
    }

    fn set_style(&mut self, style_url: &str) {
        self.style_requested.set(true);
        self.map.set_style(style_url);
    }

    fn add_control(&mut self, control: &MapboxControl, anchor: Anchor) {
        self.map.add_control(control.as_js(), anchor.as_str());
    }

    fn remove_control(&mut self, control: &MapboxControl) {
        self.map.remove_control(control.as_js());
    }

    fn has_source(&self, id: &str) -> bool {
        !self.map.get_source(id).is_undefined()
    }

    fn add_geojson_source(&mut self, id: &str, data: &RouteGeometry) {
        let source = GeoJsonSourceJs {
            kind: "geojson",
            data,
        };
        self.map.add_source(id, &to_js(&source));
    }

    fn set_source_data(&mut self, id: &str, data: &RouteGeometry) {
        let source = self.map.get_source(id);
        if source.is_undefined() {
            return;
        }
        source.unchecked_into::<GeoJsonSource>().set_data(&to_js(data));
    }

    fn remove_source(&mut self, id: &str) {
        self.map.remove_source(id);
    }

    fn has_layer(&self, id: &str) -> bool {
        !self.map.get_layer(id).is_undefined()
    }

    fn add_line_layer(&mut self, layer: &LineLayer) {
        self.map.add_layer(&to_js(layer));
    }

    fn remove_layer(&mut self, id: &str) {
        self.map.remove_layer(id);
    }

    fn destroy(&mut self) {
        self.map.remove();
    }
}

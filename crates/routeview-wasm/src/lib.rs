//! routeview-wasm: WebAssembly bindings for routeview-core
//!
//! This crate drives a Mapbox GL JS map from a `routeview-core` session:
//! it owns the map, attaches the geolocation and directions controls once
//! the style has loaded, draws the selected route, and switches between the
//! light and dark navigation styles without leaving controls or route
//! primitives behind.
//!
//! What it provides
//! ----------------
//! - Panic hook installation on module load (via `#[wasm_bindgen(start)]`)
//! - `RouteView`: `new RouteView(container, configJson?)`, `setStyle("light" | "dark")`,
//!   `toggleStyle()`, `teardown()`, `style()`, `phase()`
//! - Helpers: `default_config_json()`, `normalize_theme(name)`
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { RouteView } from 'routeview-wasm';
//!
//! async function main() {
//!   await init();
//!   mapboxgl.accessToken = 'pk....';
//!   const view = new RouteView('map');
//!
//!   document.querySelector('#theme').onclick = () => {
//!     view.toggleStyle();
//!     console.log('style:', view.style(), 'phase:', view.phase());
//!   };
//!
//!   window.addEventListener('beforeunload', () => view.teardown());
//! }
//! main();
//! ```
//!
//! Notes
//! -----
//! - `mapboxgl` and `MapboxDirections` must be page globals (CDN bundles or
//!   assigned to `window` by the bundler).
//! - The config JSON follows `routeview_core::ViewConfig`; every field is
//!   optional. See `default_config_json()` for the full shape.
//! - Engine and control events are queued and handed to the session one at
//!   a time; a listener that outlives its view does nothing.

mod bindings;
mod dispatch;
mod engine;
mod options;

use std::rc::Rc;

use routeview_core::{Phase, Style, ViewConfig};
use wasm_bindgen::prelude::*;

use crate::dispatch::{Session, Shared};
use crate::engine::{MapboxControls, MapboxEngine};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/* --------------------------------------------------------------------------
   RouteView
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub struct RouteView {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl RouteView {
    /// Creates the map in the element with id `container`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: &str, config_json: Option<String>) -> Result<RouteView, JsError> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => ViewConfig::from_json_str(json)?,
            _ => ViewConfig::default(),
        };
        if let Some(token) = config.access_token.as_deref() {
            options::set_page_access_token(token);
        }

        let shared = Shared::new();
        let weak = Rc::downgrade(&shared);
        let container = container.to_string();
        let session = Session::create(
            config,
            |opts| MapboxEngine::new(&container, opts, weak.clone()),
            MapboxControls::new(weak.clone()),
        )?;
        web_sys::console::log_1(
            &format!("routeview: map created in #{container} ({})", session.style()).into(),
        );
        shared.install(session);

        Ok(RouteView { shared })
    }

    /// Removes the controls and the map. Idempotent.
    pub fn teardown(&self) {
        self.shared.with_session(|s| s.teardown());
    }

    /// `"light"` or `"dark"`; the pending style while a swap is in flight.
    pub fn style(&self) -> Option<String> {
        self.shared
            .with_session(|s| s.style().as_str().to_string())
    }

    /// `"initializing"`, `"ready"`, `"style_swapping"` or `"closed"`.
    pub fn phase(&self) -> String {
        self.shared
            .with_session(|s| s.phase())
            .unwrap_or(Phase::Closed)
            .as_str()
            .to_string()
    }
}

#[cfg(feature = "theme-toggle")]
#[wasm_bindgen]
impl RouteView {
    /// Switches to `"light"` or `"dark"`. Unknown names are rejected.
    #[wasm_bindgen(js_name = setStyle)]
    pub fn set_style(&self, style: &str) -> Result<(), JsError> {
        let style: Style = style.parse()?;
        self.shared
            .with_session(|s| s.set_style(style))
            .transpose()?;
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleStyle)]
    pub fn toggle_style(&self) -> Result<(), JsError> {
        self.shared.with_session(|s| s.toggle_style()).transpose()?;
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Helpers
-------------------------------------------------------------------------- */

/// The default configuration as pretty-printed JSON.
#[wasm_bindgen]
pub fn default_config_json() -> Result<String, JsError> {
    Ok(serde_json::to_string_pretty(&ViewConfig::default())?)
}

/// Canonical theme name for user input such as `" Dark "`.
#[wasm_bindgen]
pub fn normalize_theme(name: &str) -> Result<String, JsError> {
    let style: Style = name.parse()?;
    Ok(style.as_str().to_string())
}

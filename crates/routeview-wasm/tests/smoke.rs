// JsError can only be built on wasm32; run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

// Import the wasm functions from this crate
use routeview_wasm::{default_config_json, normalize_theme};

#[wasm_bindgen_test]
fn theme_names_are_normalized() {
    routeview_wasm::start();

    assert_eq!(normalize_theme(" Dark ").ok().as_deref(), Some("dark"));
    assert_eq!(normalize_theme("LIGHT").ok().as_deref(), Some("light"));
    assert!(normalize_theme("sepia").is_err());
}

#[wasm_bindgen_test]
fn default_config_starts_dark_over_delhi() {
    let json = default_config_json().ok().expect("default config serializes");
    let cfg: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(cfg["initial_style"], "dark");
    assert_eq!(cfg["viewport"]["center"][0], 77.2295);
    assert_eq!(cfg["viewport"]["zoom"], 9.0);
    assert!(cfg.get("access_token").is_none());
}

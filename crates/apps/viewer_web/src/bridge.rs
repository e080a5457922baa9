//! Calls into the three.js overlay glue in `js/overlay_bridge.js`.

use globe::OverlaySink;
use globe::feed::{ArcLayer, PointLayer};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/overlay_bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = createScene, catch)]
    pub fn create_scene(container_id: &str, bootstrap: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_name = setArcs)]
    fn set_arcs(layer: JsValue);

    #[wasm_bindgen(js_name = setPoints)]
    fn set_points(layer: JsValue);

    #[wasm_bindgen(js_name = setCountries)]
    pub fn set_countries(features: JsValue);

    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(eye_x: f64, eye_y: f64, eye_z: f64);

    #[wasm_bindgen(js_name = resizeRenderer)]
    pub fn resize_renderer(width: f64, height: f64);
}

/// Plain JS objects (no `Map`s), as the overlay's accessors expect.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

#[derive(Debug, Default)]
pub struct JsOverlay;

impl OverlaySink for JsOverlay {
    fn set_arcs(&mut self, layer: &ArcLayer) {
        match to_js(layer) {
            Ok(value) => set_arcs(value),
            Err(err) => tracing::error!(?err, "failed to serialize arc layer"),
        }
    }

    fn set_points(&mut self, layer: &PointLayer) {
        match to_js(layer) {
            Ok(value) => set_points(value),
            Err(err) => tracing::error!(?err, "failed to serialize point layer"),
        }
    }
}

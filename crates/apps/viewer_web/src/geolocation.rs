use foundation::math::LatLng;
use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Asks the browser for one position fix. Denial or absence keeps the
/// default location; `on_fix` runs at most once.
pub fn request(on_fix: impl FnOnce(LatLng) + 'static) {
    let Some(geo) = web_sys::window().and_then(|w| w.navigator().geolocation().ok()) else {
        tracing::debug!("geolocation unavailable");
        return;
    };

    let success = Closure::once_into_js(move |position: JsValue| match coords(&position) {
        Some(at) => on_fix(at),
        None => tracing::warn!("geolocation fix without coordinates"),
    });
    let failure = Closure::once_into_js(|err: JsValue| {
        tracing::debug!(?err, "geolocation refused");
    });

    if let Err(err) = geo
        .get_current_position_with_error_callback(success.unchecked_ref(), Some(failure.unchecked_ref()))
    {
        tracing::debug!(?err, "geolocation request failed");
    }
}

fn coords(position: &JsValue) -> Option<LatLng> {
    let coords = Reflect::get(position, &JsValue::from_str("coords")).ok()?;
    let lat = Reflect::get(&coords, &JsValue::from_str("latitude")).ok()?.as_f64()?;
    let lng = Reflect::get(&coords, &JsValue::from_str("longitude")).ok()?.as_f64()?;
    Some(LatLng::new(lat, lng))
}

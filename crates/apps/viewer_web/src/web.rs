//! Browser entry points. The page wires DOM events and the
//! `requestAnimationFrame` loop to these exports.

use std::cell::RefCell;
use std::rc::Rc;

use foundation::Millis;
use globe::camera::Viewport;
use globe::countries::{CountryCollection, parse_countries};
use globe::interaction::is_submit_key;
use globe::scene::SceneBootstrap;
use globe::GlobeConfig;
use gloo_net::http::Request;
use rand::SeedableRng;
use rand::rngs::StdRng;
use store::{FirestoreMessageStore, GlooTransport};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::{GlobeApp, save_submission};
use crate::bridge::{self, JsOverlay};
use crate::{dom, geolocation, logging};

const COUNTRIES_URL: &str = "files/globe-data-min.json";

struct Viewer {
    app: GlobeApp,
    overlay: JsOverlay,
    store: Option<Rc<FirestoreMessageStore<GlooTransport>>>,
}

thread_local! {
    static STATE: RefCell<Option<Viewer>> = const { RefCell::new(None) };
}

fn with_viewer<R>(f: impl FnOnce(&mut Viewer) -> R) -> Option<R> {
    STATE.with(|state| state.borrow_mut().as_mut().map(f))
}

/// Same clock as the `requestAnimationFrame` timestamps.
fn now() -> Millis {
    let ms = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    Millis::from_f64(ms)
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init("info");
    Ok(())
}

/// Builds the scene and state. `config_json` overrides the flagship preset.
#[wasm_bindgen]
pub fn boot(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => GlobeConfig::from_json(json).map_err(js_error)?,
        _ => GlobeConfig::default(),
    };

    bridge::create_scene(
        dom::CONTAINER_ID,
        bridge::to_js(&SceneBootstrap::from_config(&config))?,
    )?;
    dom::ensure_tooltip()?;

    let store = config.persistence.as_ref().map(|p| {
        Rc::new(FirestoreMessageStore::new(
            GlooTransport,
            p.project_id.clone(),
            p.api_key.clone(),
            p.collection.clone(),
        ))
    });
    if store.is_none() {
        tracing::info!("no persistence configured; messages stay local");
    }

    let mut app = GlobeApp::new(config, StdRng::from_entropy());
    let mut overlay = JsOverlay;
    app.boot(now(), &mut overlay);
    dom::render_stats(&app.stats());
    dom::render_button(app.button());

    STATE.with(|state| {
        *state.borrow_mut() = Some(Viewer {
            app,
            overlay,
            store,
        });
    });

    spawn_local(load_countries());
    geolocation::request(|at| {
        let resolved = with_viewer(|v| v.app.resolve_user_location(at));
        tracing::debug!(?resolved, lat = at.lat, lng = at.lng, "user location");
    });
    Ok(())
}

/// Sends whatever is in the message input (a default message when blank).
#[wasm_bindgen]
pub fn submit_message() {
    let Some(text) = dom::take_input() else {
        tracing::warn!("message input missing");
        return;
    };
    let submitted = with_viewer(|v| {
        let outcome = v.app.submit(&text, now(), &mut v.overlay);
        (outcome, v.store.clone())
    });
    let Some((outcome, store)) = submitted else {
        return;
    };

    dom::render_button(outcome.button);
    if let Some(stats) = &outcome.stats {
        dom::render_stats(stats);
    }
    if let Some(store) = store {
        spawn_local(async move {
            // The arc is already flying; a failed write is only logged.
            let _ = save_submission(store.as_ref(), &outcome.record).await;
        });
    }
}

/// Returns `true` when the key was consumed and the default action should be
/// prevented.
#[wasm_bindgen]
pub fn on_input_key(key: &str, shift: bool) -> bool {
    if !is_submit_key(key, shift) {
        return false;
    }
    submit_message();
    true
}

#[wasm_bindgen]
pub fn on_frame(timestamp_ms: f64) {
    let Some(outcome) = with_viewer(|v| v.app.frame(timestamp_ms, &mut v.overlay)) else {
        return;
    };
    if let Some(stats) = &outcome.stats {
        dom::render_stats(stats);
    }
    for update in &outcome.ui {
        dom::apply(update);
    }
    bridge::render_frame(outcome.eye.x, outcome.eye.y, outcome.eye.z);
}

#[wasm_bindgen]
pub fn on_click(client_x: f64, client_y: f64) {
    if let Some(tooltip) = with_viewer(|v| v.app.click(client_x, client_y, now())).flatten() {
        dom::show_tooltip(&tooltip);
    }
}

#[wasm_bindgen]
pub fn on_pointer_down(client_x: f64, client_y: f64) {
    with_viewer(|v| v.app.pointer_down(client_x, client_y));
}

#[wasm_bindgen]
pub fn on_pointer_move(client_x: f64, client_y: f64) {
    with_viewer(|v| v.app.pointer_move(client_x, client_y));
}

#[wasm_bindgen]
pub fn on_pointer_up() {
    with_viewer(|v| v.app.pointer_up());
}

#[wasm_bindgen]
pub fn on_wheel(delta_y: f64) {
    with_viewer(|v| v.app.wheel(delta_y));
}

/// Canvas bounding rectangle in client pixels.
#[wasm_bindgen]
pub fn on_resize(left: f64, top: f64, width: f64, height: f64) {
    with_viewer(|v| v.app.resize(Viewport::new(left, top, width, height)));
    bridge::resize_renderer(width, height);
}

async fn load_countries() {
    let countries = match fetch_countries(COUNTRIES_URL).await {
        Ok(countries) => countries,
        Err(err) => {
            tracing::error!(?err, "failed to load country boundaries; globe renders without polygons");
            return;
        }
    };
    match bridge::to_js(&countries.features) {
        Ok(features) => bridge::set_countries(features),
        Err(err) => tracing::error!(?err, "failed to hand country boundaries to the overlay"),
    }
}

async fn fetch_countries(url: &str) -> Result<CountryCollection, JsValue> {
    let resp = Request::get(url).send().await.map_err(js_error)?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {} for {url}", resp.status())));
    }
    let text = resp.text().await.map_err(js_error)?;
    parse_countries(&text).map_err(js_error)
}

use globe::interaction::{ButtonView, StatsView, TooltipView, UiUpdate};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement};

pub const CONTAINER_ID: &str = "globe-container";
pub const INPUT_ID: &str = "message-input";
pub const SEND_ID: &str = "send-btn";
pub const STAT_SENT_ID: &str = "stat-sent";
pub const STAT_TRANSIT_ID: &str = "stat-transit";
pub const TOOLTIP_ID: &str = "message-tooltip";

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))
}

fn element<T: JsCast>(id: &str) -> Option<T> {
    document()
        .ok()?
        .get_element_by_id(id)?
        .dyn_into::<T>()
        .ok()
}

/// Reads and clears the message input. `None` when the page has no input.
pub fn take_input() -> Option<String> {
    let input = element::<HtmlInputElement>(INPUT_ID)?;
    let value = input.value();
    input.set_value("");
    Some(value)
}

pub fn focus_input() {
    if let Some(input) = element::<HtmlElement>(INPUT_ID) {
        let _ = input.focus();
    }
}

pub fn render_button(view: ButtonView) {
    if let Some(button) = element::<HtmlButtonElement>(SEND_ID) {
        button.set_text_content(Some(view.label));
        button.set_disabled(view.disabled);
    }
}

pub fn render_stats(stats: &StatsView) {
    if let Some(el) = element::<HtmlElement>(STAT_SENT_ID) {
        el.set_text_content(Some(&stats.sent));
    }
    if let Some(el) = element::<HtmlElement>(STAT_TRANSIT_ID) {
        el.set_text_content(Some(&stats.in_transit));
    }
}

/// Appends the tooltip container to `<body>` unless the page already has one.
pub fn ensure_tooltip() -> Result<(), JsValue> {
    let doc = document()?;
    if doc.get_element_by_id(TOOLTIP_ID).is_some() {
        return Ok(());
    }
    let tooltip = doc.create_element("div")?;
    tooltip.set_id(TOOLTIP_ID);
    tooltip.set_inner_html(r#"<div class="tooltip-content"><p class="tooltip-message"></p></div>"#);
    let body = doc
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&tooltip)?;
    Ok(())
}

pub fn show_tooltip(view: &TooltipView) {
    let Some(tooltip) = element::<HtmlElement>(TOOLTIP_ID) else {
        return;
    };
    if let Ok(Some(message)) = tooltip.query_selector(".tooltip-message") {
        message.set_text_content(Some(&view.text));
    }
    let style = tooltip.style();
    let _ = style.set_property("left", &format!("{}px", view.x));
    let _ = style.set_property("top", &format!("{}px", view.y));
    let _ = tooltip.class_list().add_1("visible");
}

pub fn hide_tooltip() {
    if let Some(tooltip) = element::<HtmlElement>(TOOLTIP_ID) {
        let _ = tooltip.class_list().remove_1("visible");
    }
}

pub fn apply(update: &UiUpdate) {
    match update {
        UiUpdate::Button(view) => render_button(*view),
        UiUpdate::TooltipHidden => hide_tooltip(),
        UiUpdate::FocusInput => focus_input(),
    }
}

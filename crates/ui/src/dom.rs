use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, HtmlElement};

/// Element the watchlist is rendered into
pub const CONTAINER_ID: &str = "watchlist-container";

/// Element hosting the particle canvas
pub const PARTICLES_ID: &str = "particles-js";

/// Get document helper
pub fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

/// True while the HTML is still being parsed
pub fn is_loading(doc: &Document) -> bool {
    js_sys::Reflect::get(doc, &"readyState".into())
        .ok()
        .and_then(|v| v.as_string())
        .is_some_and(|state| state == "loading")
}

/// Replace the content of the element with `id`
pub fn set_inner_html(id: &str, html: &str) -> Result<(), JsValue> {
    let doc = document().ok_or("No document")?;
    let el = doc
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("No #{id} element")))?;
    el.set_inner_html(html);
    Ok(())
}

/// First element matching `selector`, as an `HtmlElement`
pub fn query_html_element(doc: &Document, selector: &str) -> Option<HtmlElement> {
    doc.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Run `f` once after `delay_ms`
pub fn set_timeout(delay_ms: i32, f: impl FnOnce() + 'static) {
    let callback = Closure::once(Box::new(f) as Box<dyn FnOnce()>);

    if let Some(win) = window() {
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms,
        );
    }
    callback.forget();
}

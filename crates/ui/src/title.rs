use web_sys::Document;

use crate::dom;

/// Delay before the heading starts moving in
const DELAY_MS: i32 = 300;

/// Fade and slide the first `h1` into place
pub fn fade_in(doc: &Document) {
    let Some(title) = dom::query_html_element(doc, "h1") else {
        return;
    };

    let style = title.style();
    let _ = style.set_property("opacity", "0");
    let _ = style.set_property("transform", "translateY(-20px)");

    dom::set_timeout(DELAY_MS, move || {
        let style = title.style();
        let _ = style.set_property("transition", "opacity 1s ease, transform 1s ease");
        let _ = style.set_property("opacity", "1");
        let _ = style.set_property("transform", "translateY(0)");
    });
}

mod background;
pub mod components;
mod config;
mod dom;
mod loader;
mod sqljs;
mod title;

use std::sync::atomic::{AtomicBool, Ordering};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::AddEventListenerOptions;

use crate::config::RuntimeConfig;

static STARTED: AtomicBool = AtomicBool::new(false);

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = dom::document().ok_or("No document")?;

    // Module scripts usually run after parsing, but a classic <script> in
    // <head> does not.
    if dom::is_loading(&document) {
        let callback = Closure::once(start);
        let opts = AddEventListenerOptions::new();
        opts.set_once(true);
        document.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            callback.as_ref().unchecked_ref(),
            &opts,
        )?;
        callback.forget();
    } else {
        start();
    }

    Ok(())
}

/// Page entry point. Runs at most once per page load.
fn start() {
    if STARTED.swap(true, Ordering::SeqCst) {
        return;
    }

    let Some(document) = dom::document() else {
        return;
    };

    let config = RuntimeConfig::from_window();
    web_sys::console::log_1(
        &format!(
            "[sensus] database: {}, country: {}",
            config.database_url, config.country
        )
        .into(),
    );

    spawn_local(async move {
        loader::run(&config).await;
    });

    if let Err(e) = background::start(&document) {
        web_sys::console::warn_2(&"[sensus] particle background disabled:".into(), &e);
    }
    title::fade_in(&document);
}

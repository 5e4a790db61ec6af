//! Watchlist loader
//!
//! Engine init, then fetch, then query, then one write to the container.
//! Each step waits for the previous one; nothing is retried and nothing
//! times out.

use sensus_web_watchlist::{load_latest, render_outcome, Outcome};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, window, Response};

use crate::config::RuntimeConfig;
use crate::dom::{self, CONTAINER_ID};
use crate::sqljs::SqlJs;

/// Load the latest record and render it into `#watchlist-container`
pub async fn run(config: &RuntimeConfig) {
    let outcome = load(config).await;

    if let Err(e) = dom::set_inner_html(CONTAINER_ID, &render_outcome(&outcome)) {
        console::error_2(&"[sensus] cannot render watchlist:".into(), &e);
    }
}

async fn load(config: &RuntimeConfig) -> Outcome {
    let engine = match SqlJs::init(&config.sql_js_base).await {
        Ok(engine) => engine,
        Err(e) => {
            console::error_2(&"Error initializing SQL.js:".into(), &e);
            return Outcome::Failure;
        }
    };

    let bytes = match fetch_bytes(&config.database_url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            console::error_2(&"Error fetching database:".into(), &e);
            return Outcome::Failure;
        }
    };

    let result = load_latest(&engine, &bytes, &config.country);
    if let Err(e) = &result {
        console::error_2(&"Error fetching database:".into(), &e.to_string().into());
    }
    Outcome::from_result(result)
}

/// GET `url` and return the body as raw bytes
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, JsValue> {
    let win = window().ok_or("No window")?;

    let resp_val = JsFuture::from(win.fetch_with_str(url)).await?;
    let resp: Response = resp_val.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "HTTP {} {} for {url}",
            resp.status(),
            resp.status_text()
        )));
    }

    let buffer = JsFuture::from(resp.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

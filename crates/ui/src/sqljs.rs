//! sql.js bindings
//!
//! sql.js is SQLite compiled to WebAssembly. Its loader (`sql-wasm.js`) is
//! fetched from the same base URL as the `.wasm` file and exposes a global
//! `initSqlJs`, which resolves to a module object whose `Database`
//! constructor takes the file image.

use sensus_web_watchlist::{EngineError, Row, SqlValue, WatchlistEngine};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = initSqlJs)]
    fn init_sql_js(config: &js_sys::Object) -> Result<js_sys::Promise, JsValue>;

    /// An open sql.js database
    pub type Database;

    #[wasm_bindgen(method, catch)]
    fn exec(this: &Database, sql: &str, params: &js_sys::Array) -> Result<js_sys::Array, JsValue>;

    #[wasm_bindgen(method)]
    fn close(this: &Database);
}

/// Open handle; closes the database when dropped
pub struct SqlJsHandle(Database);

impl Drop for SqlJsHandle {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Initialised sql.js module
pub struct SqlJs {
    module: JsValue,
    // sql.js may call back into locateFile while instantiating
    _locate_file: Closure<dyn Fn(String) -> String>,
}

/// Loader script name inside the sql.js distribution
const LOADER_SCRIPT: &str = "sql-wasm.js";

/// URL of `file` under the distribution `base`
pub fn asset_url(base: &str, file: &str) -> String {
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{file}")
    } else {
        format!("{base}/{file}")
    }
}

/// Insert `<script src=...>` for the loader unless `initSqlJs` already exists
async fn ensure_loader(base: &str) -> Result<(), JsValue> {
    let win = web_sys::window().ok_or("No window")?;
    if js_sys::Reflect::has(&win, &"initSqlJs".into())? {
        return Ok(());
    }

    let doc = win.document().ok_or("No document")?;
    let script = doc
        .create_element("script")?
        .dyn_into::<web_sys::HtmlScriptElement>()?;
    script.set_src(&asset_url(base, LOADER_SCRIPT));

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });

    doc.head().ok_or("No <head>")?.append_child(&script)?;
    JsFuture::from(loaded)
        .await
        .map_err(|_| JsValue::from_str(&format!("failed to load {}", script.src())))?;
    Ok(())
}

impl SqlJs {
    /// Initialise the engine. `base` is the URL prefix of the sql.js
    /// distribution holding both `sql-wasm.js` and `sql-wasm.wasm`.
    pub async fn init(base: &str) -> Result<Self, JsValue> {
        ensure_loader(base).await?;

        let base = base.to_string();
        let locate_file = Closure::wrap(Box::new(move |file: String| asset_url(&base, &file))
            as Box<dyn Fn(String) -> String>);

        let config = js_sys::Object::new();
        js_sys::Reflect::set(&config, &"locateFile".into(), locate_file.as_ref())?;

        let module = JsFuture::from(init_sql_js(&config)?).await?;

        Ok(Self {
            module,
            _locate_file: locate_file,
        })
    }
}

impl WatchlistEngine for SqlJs {
    type Handle = SqlJsHandle;

    fn open(&self, bytes: &[u8]) -> Result<Self::Handle, EngineError> {
        let ctor = js_sys::Reflect::get(&self.module, &"Database".into())
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| EngineError::Init("sql.js module has no Database constructor".into()))?;

        let args = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let db = js_sys::Reflect::construct(&ctor, &args).map_err(|e| EngineError::Open(describe(&e)))?;

        Ok(SqlJsHandle(db.unchecked_into()))
    }

    fn query(
        &self,
        handle: &Self::Handle,
        sql: &str,
        params: &[&str],
    ) -> Result<Vec<Row>, EngineError> {
        let bound: js_sys::Array = params.iter().map(|p| JsValue::from_str(p)).collect();
        let results = handle
            .0
            .exec(sql, &bound)
            .map_err(|e| EngineError::Query(describe(&e)))?;

        // exec returns one {columns, values} entry per statement; an empty
        // result set yields no entry at all.
        if results.length() == 0 {
            return Ok(Vec::new());
        }

        let values = js_sys::Reflect::get(&results.get(0), &"values".into())
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Array>().ok())
            .ok_or_else(|| EngineError::Query("result has no values".into()))?;

        Ok(values
            .iter()
            .map(|row| {
                row.dyn_into::<js_sys::Array>()
                    .map(|cells| cells.iter().map(|c| to_sql_value(&c)).collect::<Row>())
                    .unwrap_or_default()
            })
            .collect())
    }
}

fn to_sql_value(value: &JsValue) -> SqlValue {
    if value.is_null() || value.is_undefined() {
        return SqlValue::Null;
    }
    if let Some(s) = value.as_string() {
        return SqlValue::Text(s);
    }
    if let Some(n) = value.as_f64() {
        return number_value(n);
    }
    if let Some(bytes) = value.dyn_ref::<js_sys::Uint8Array>() {
        return SqlValue::Blob(bytes.to_vec());
    }
    SqlValue::Text(describe(value))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number_value(n: f64) -> SqlValue {
    // JS has one number type; SQLite integers come back as whole doubles
    let int = n as i64;
    if n.fract() == 0.0 && int as f64 == n {
        SqlValue::Integer(int)
    } else {
        SqlValue::Real(n)
    }
}

/// Best-effort message for a thrown JS value
pub fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(20_240_115.0), SqlValue::Integer(20_240_115));
        assert_eq!(number_value(-3.0), SqlValue::Integer(-3));
        assert_eq!(number_value(0.5), SqlValue::Real(0.5));
    }

    #[test]
    fn test_asset_url_shares_base() {
        let cdn = "https://cdnjs.cloudflare.com/ajax/libs/sql.js/1.6.2/";
        assert_eq!(
            asset_url(cdn, LOADER_SCRIPT),
            "https://cdnjs.cloudflare.com/ajax/libs/sql.js/1.6.2/sql-wasm.js"
        );
        assert_eq!(asset_url("/vendor/sqljs", "sql-wasm.wasm"), "/vendor/sqljs/sql-wasm.wasm");
        assert_eq!(asset_url("", "sql-wasm.js"), "sql-wasm.js");
    }
}

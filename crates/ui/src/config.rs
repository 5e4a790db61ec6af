//! Runtime configuration for the page
//!
//! The host serves `/config.js`, which sets `window.SENSUS_CONFIG`. When the
//! page is opened from a plain static server that script is absent and the
//! defaults below apply.

use sensus_web_watchlist::DEFAULT_COUNTRY;
use web_sys::window;

/// Database file, relative to the page
pub const DEFAULT_DATABASE_URL: &str = "../src/sensusmundi.db";

/// sql.js distribution base; both `sql-wasm.js` and `sql-wasm.wasm` load
/// from here
pub const DEFAULT_SQLJS_BASE: &str = "https://cdnjs.cloudflare.com/ajax/libs/sql.js/1.6.2/";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub database_url: String,
    pub sql_js_base: String,
    pub country: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            sql_js_base: DEFAULT_SQLJS_BASE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Read `window.SENSUS_CONFIG`, keeping defaults for missing keys
    pub fn from_window() -> Self {
        let mut config = Self::default();

        let Some(obj) = window()
            .and_then(|w| js_sys::Reflect::get(&w, &"SENSUS_CONFIG".into()).ok())
            .filter(|v| v.is_object())
        else {
            return config;
        };

        let get = |key: &str| {
            js_sys::Reflect::get(&obj, &key.into())
                .ok()
                .and_then(|v| v.as_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(url) = get("databaseUrl") {
            config.database_url = url;
        }
        if let Some(base) = get("sqlJsBase") {
            config.sql_js_base = base;
        }
        if let Some(country) = get("country") {
            config.country = country;
        }

        config
    }
}

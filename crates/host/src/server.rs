//! HTTP routes for sensus-web
//!
//! Serves the embedded page, the database file the page fetches, a small
//! runtime config script, and a JSON view of the same render.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sensus_web_watchlist::{render_outcome, Outcome};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::embedded;
use crate::store;

/// Path the page fetches the database from (`../src/sensusmundi.db`
/// relative to the page at `/`)
pub const DATABASE_ROUTE: &str = "/src/sensusmundi.db";

const VERSION: &str = env!("CARGO_PKG_VERSION");

// Shared state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn database_path(&self) -> PathBuf {
        self.config.data.database_path.clone()
    }
}

/// Full application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(serve_index))
        .route("/config.js", get(serve_config_js))
        .route(DATABASE_ROUTE, get(serve_database))
        .route("/*path", get(serve_static))
        .nest("/api", api_router())
        .with_state(state)
        .layer(cors)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/watchlist", get(latest_watchlist))
}

fn asset_response(data: Vec<u8>, mime: &str) -> Response<Body> {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        data,
    )
        .into_response()
}

/// Serve index.html at root
async fn serve_index() -> Response<Body> {
    match embedded::get_asset("index.html") {
        Some((data, mime)) => asset_response(data, mime),
        None => (StatusCode::NOT_FOUND, "index.html not found").into_response(),
    }
}

/// Serve embedded static file, falling back to index.html
async fn serve_static(Path(path): Path<String>) -> Response<Body> {
    match embedded::get_asset(&path) {
        Some((data, mime)) => asset_response(data, mime),
        None => {
            tracing::debug!(%path, "Asset not found");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

/// Serve /config.js for the page
async fn serve_config_js(State(state): State<AppState>) -> Response<Body> {
    let runtime = serde_json::json!({
        "databaseUrl": DATABASE_ROUTE,
        "sqlJsBase": state.config.data.sqljs_base,
        "country": state.config.watchlist.country,
    });
    let js = format!("window.SENSUS_CONFIG = {runtime};");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        js,
    )
        .into_response()
}

/// Serve the raw database image
async fn serve_database(State(state): State<AppState>) -> Response<Body> {
    let path = state.database_path();
    match tokio::fs::read(&path).await {
        Ok(data) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/vnd.sqlite3"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            data,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Database not readable: {e}");
            (StatusCode::NOT_FOUND, "Database not found").into_response()
        }
    }
}

// Handlers

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": VERSION }))
}

/// Render the latest watchlist server-side
async fn latest_watchlist(State(state): State<AppState>) -> Json<serde_json::Value> {
    let path = state.database_path();
    let country = state.config.watchlist.country.clone();

    let outcome = tokio::task::spawn_blocking(move || store::latest_outcome(&path, &country))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Watchlist task failed: {e}");
            Outcome::Failure
        });

    let record = match &outcome {
        Outcome::Success(record) => serde_json::to_value(record).unwrap_or_default(),
        Outcome::Empty | Outcome::Failure => serde_json::Value::Null,
    };

    Json(serde_json::json!({
        "status": outcome.status(),
        "html": render_outcome(&outcome),
        "record": record,
    }))
}

//! Shared watchlist types for sensus-web
//!
//! Holds the record model, the fixed latest-record query, the engine
//! capability both the browser and the host implement, and the HTML
//! renderer that turns a load outcome into the container markup.

pub mod engine;
pub mod error;
pub mod loader;
pub mod query;
pub mod record;
pub mod render;

pub use engine::{EngineError, Row, SqlValue, WatchlistEngine};
pub use error::WatchlistError;
pub use loader::{load_latest, Outcome};
pub use query::{DEFAULT_COUNTRY, LATEST_WATCHLIST_SQL};
pub use record::WatchlistRecord;
pub use render::render_outcome;

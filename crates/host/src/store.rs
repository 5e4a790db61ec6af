//! Watchlist database file
//!
//! The page never writes; the generator owns the data. The host only needs
//! to read the file image and, for `init-db`, lay down the same table the
//! generator creates.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use sensus_web_watchlist::{load_latest, Outcome};

use crate::engine::SqliteEngine;

/// `watchlist` table as created by the generator
pub const WATCHLIST_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS watchlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    country TEXT NOT NULL,
    date_added DATE NOT NULL,
    watchlist TEXT NOT NULL,
    urls_used TEXT NOT NULL
)";

/// Create the `watchlist` table if missing
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(WATCHLIST_SCHEMA, [])
        .context("Failed to create watchlist table")?;
    Ok(())
}

/// Create (or open) the database at `path` and ensure the schema
pub fn create_database(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    init_schema(&conn)
}

/// Read the whole database image
pub fn read_database(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read database {}", path.display()))
}

/// Latest watchlist for `country` in the database at `path`.
/// Errors are logged and collapse to [`Outcome::Failure`].
pub fn latest_outcome(path: &Path, country: &str) -> Outcome {
    let result = read_database(path).and_then(|bytes| {
        load_latest(&SqliteEngine, &bytes, country).context("Failed to query watchlist")
    });

    match &result {
        Ok(Some(record)) => tracing::debug!(country, date = %record.date_added, "Loaded watchlist"),
        Ok(None) => tracing::info!(country, "No watchlist rows"),
        Err(e) => tracing::error!(path = %path.display(), "Error loading watchlist: {e:#}"),
    }

    Outcome::from_result(result)
}

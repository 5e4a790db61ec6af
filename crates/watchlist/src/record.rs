use serde::Serialize;

use crate::engine::Row;
use crate::error::WatchlistError;
use crate::query::LATEST_WATCHLIST_COLUMNS;

/// One published watchlist, as stored by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistRecord {
    /// Narrative summary text
    pub watchlist: String,
    pub country: String,
    /// Publication date, usually `YYYY-MM-DD`
    pub date_added: String,
    /// Source URLs, comma separated (or a JSON array)
    pub urls_used: String,
}

impl WatchlistRecord {
    /// Build a record from a row of the latest-watchlist query
    pub fn from_row(row: Row) -> Result<Self, WatchlistError> {
        if row.len() < LATEST_WATCHLIST_COLUMNS {
            return Err(WatchlistError::MalformedRow {
                expected: LATEST_WATCHLIST_COLUMNS,
                found: row.len(),
            });
        }

        let mut cells = row.into_iter().map(crate::SqlValue::into_text);
        // Length checked above
        let mut next = || cells.next().unwrap_or_default();

        Ok(Self {
            watchlist: next(),
            country: next(),
            date_added: next(),
            urls_used: next(),
        })
    }

    /// Trimmed, non-empty source URLs in stored order
    pub fn sources(&self) -> Vec<String> {
        let raw = self.urls_used.trim();

        if raw.starts_with('[') {
            if let Ok(list) = serde_json::from_str::<Vec<serde_json::Value>>(raw) {
                return list
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }

        raw.split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect()
    }
}

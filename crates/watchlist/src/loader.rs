//! Open a database image and pick the latest watchlist record
//!
//! The browser and the host share this step; each supplies its own
//! [`WatchlistEngine`] and gets the bytes its own way.

use crate::engine::WatchlistEngine;
use crate::error::WatchlistError;
use crate::query::LATEST_WATCHLIST_SQL;
use crate::record::WatchlistRecord;

/// Result of one load attempt, as shown to the reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A record was found
    Success(WatchlistRecord),
    /// The query matched nothing
    Empty,
    /// Engine, fetch or query failure. Details go to the log only.
    Failure,
}

impl Outcome {
    /// Collapse a load result. Callers log the error before calling this.
    pub fn from_result<E>(result: Result<Option<WatchlistRecord>, E>) -> Self {
        match result {
            Ok(Some(record)) => Self::Success(record),
            Ok(None) => Self::Empty,
            Err(_) => Self::Failure,
        }
    }

    /// Short status name used by the host API
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Empty => "empty",
            Self::Failure => "failure",
        }
    }
}

/// Open `bytes` with `engine` and return the newest record for `country`
pub fn load_latest<E: WatchlistEngine>(
    engine: &E,
    bytes: &[u8],
    country: &str,
) -> Result<Option<WatchlistRecord>, WatchlistError> {
    let handle = engine.open(bytes)?;
    let rows = engine.query(&handle, LATEST_WATCHLIST_SQL, &[country])?;

    rows.into_iter()
        .next()
        .map(WatchlistRecord::from_row)
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::engine::{EngineError, Row, SqlValue};

    /// In-memory stand-in for a SQL engine. The "file" is one record per
    /// line as `country|date|text|urls`; queries filter on the first
    /// parameter and return the newest row.
    #[derive(Default)]
    struct FakeEngine {
        seen_sql: RefCell<Vec<String>>,
        fail_open: bool,
    }

    impl WatchlistEngine for FakeEngine {
        type Handle = Vec<[String; 4]>;

        fn open(&self, bytes: &[u8]) -> Result<Self::Handle, EngineError> {
            if self.fail_open {
                return Err(EngineError::Open("file is not a database".into()));
            }
            let text = std::str::from_utf8(bytes).map_err(|e| EngineError::Open(e.to_string()))?;
            Ok(text
                .lines()
                .filter_map(|line| {
                    let mut parts = line.splitn(4, '|').map(str::to_string);
                    Some([parts.next()?, parts.next()?, parts.next()?, parts.next()?])
                })
                .collect())
        }

        fn query(
            &self,
            handle: &Self::Handle,
            sql: &str,
            params: &[&str],
        ) -> Result<Vec<Row>, EngineError> {
            self.seen_sql.borrow_mut().push(sql.to_string());
            let country = params.first().ok_or_else(|| EngineError::Query("missing parameter".into()))?;
            let newest = handle
                .iter()
                .filter(|[c, ..]| c.as_str() == *country)
                .max_by(|a, b| a[1].cmp(&b[1]));
            Ok(newest
                .map(|[country, date, text, urls]| {
                    vec![
                        SqlValue::from(text.as_str()),
                        SqlValue::from(country.as_str()),
                        SqlValue::from(date.as_str()),
                        SqlValue::from(urls.as_str()),
                    ]
                })
                .into_iter()
                .collect())
        }
    }

    const DB: &[u8] = b"NATO|2024-01-10|Older.|http://old.org\n\
UK|2024-03-01|Not NATO.|http://uk.org\n\
NATO|2024-01-15|Newest.|http://x.org, http://y.org\n";

    #[test]
    fn test_load_latest_picks_newest_for_country() {
        let engine = FakeEngine::default();
        let record = load_latest(&engine, DB, "NATO").unwrap().unwrap();
        assert_eq!(record.date_added, "2024-01-15");
        assert_eq!(record.watchlist, "Newest.");
        assert_eq!(engine.seen_sql.borrow().as_slice(), [LATEST_WATCHLIST_SQL]);
    }

    #[test]
    fn test_load_latest_no_rows() {
        let engine = FakeEngine::default();
        assert_eq!(load_latest(&engine, DB, "France").unwrap(), None);
    }

    #[test]
    fn test_load_latest_open_failure() {
        let engine = FakeEngine { fail_open: true, ..FakeEngine::default() };
        let err = load_latest(&engine, DB, "NATO").unwrap_err();
        assert!(matches!(err, WatchlistError::Engine(EngineError::Open(_))));
        assert!(engine.seen_sql.borrow().is_empty());
    }

    #[test]
    fn test_outcome_from_result() {
        let engine = FakeEngine::default();
        let found = Outcome::from_result(load_latest(&engine, DB, "NATO"));
        assert_eq!(found.status(), "success");

        let empty = Outcome::from_result(load_latest(&engine, DB, "Turkey"));
        assert_eq!(empty, Outcome::Empty);

        let failed: Outcome = Outcome::from_result::<&str>(Err("network down"));
        assert_eq!(failed, Outcome::Failure);
    }
}

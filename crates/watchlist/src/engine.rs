//! Embedded SQL engine capability
//!
//! The page only needs two things from a database engine: turn a blob of
//! bytes into something queryable, and run SQL text against it. Both the
//! browser build (sql.js) and the host (rusqlite) implement this trait.

use thiserror::Error;

/// A single cell returned by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Text form of the cell, the way the page displays it
    pub fn into_text(self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::Text(s) => s,
            Self::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

/// One result row, cells in select-list order
pub type Row = Vec<SqlValue>;

/// Engine failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    Init(String),
    #[error("failed to open database: {0}")]
    Open(String),
    #[error("query failed: {0}")]
    Query(String),
}

/// Narrow capability over an embedded SQL engine
pub trait WatchlistEngine {
    /// An opened in-memory database
    type Handle;

    /// Parse a database file image into a queryable handle
    fn open(&self, bytes: &[u8]) -> Result<Self::Handle, EngineError>;

    /// Execute `sql` with positional text parameters and collect every row
    fn query(&self, handle: &Self::Handle, sql: &str, params: &[&str])
        -> Result<Vec<Row>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_text() {
        assert_eq!(SqlValue::Null.into_text(), "");
        assert_eq!(SqlValue::Integer(42).into_text(), "42");
        assert_eq!(SqlValue::from("NATO").into_text(), "NATO");
        assert_eq!(SqlValue::Blob(b"abc".to_vec()).into_text(), "abc");
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::Open("file is not a database".into());
        assert_eq!(err.to_string(), "failed to open database: file is not a database");
    }
}

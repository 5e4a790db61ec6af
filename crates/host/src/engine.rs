//! Native SQLite engine
//!
//! Implements the same open-bytes / run-query capability as sql.js in the
//! browser, so the host renders exactly what the page would.

use std::io::Write;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use sensus_web_watchlist::{EngineError, Row, SqlValue, WatchlistEngine};
use tempfile::NamedTempFile;

/// rusqlite-backed [`WatchlistEngine`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteEngine;

/// Read-only connection over a private copy of the database image
pub struct SqliteHandle {
    conn: Connection,
    // Removed from disk when the handle drops
    _file: NamedTempFile,
}

impl WatchlistEngine for SqliteEngine {
    type Handle = SqliteHandle;

    fn open(&self, bytes: &[u8]) -> Result<Self::Handle, EngineError> {
        let mut file = NamedTempFile::new().map_err(open_err)?;
        file.write_all(bytes).map_err(open_err)?;
        file.flush().map_err(open_err)?;

        let conn = Connection::open_with_flags(
            file.path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_err)?;

        Ok(SqliteHandle { conn, _file: file })
    }

    fn query(
        &self,
        handle: &Self::Handle,
        sql: &str,
        params: &[&str],
    ) -> Result<Vec<Row>, EngineError> {
        let query_err = |e: rusqlite::Error| EngineError::Query(e.to_string());

        let mut stmt = handle.conn.prepare(sql).map_err(query_err)?;
        let columns = stmt.column_count();

        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                (0..columns)
                    .map(|i| row.get_ref(i).map(to_sql_value))
                    .collect::<rusqlite::Result<Row>>()
            })
            .map_err(query_err)?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(query_err)
    }
}

fn open_err(e: impl std::fmt::Display) -> EngineError {
    EngineError::Open(e.to_string())
}

fn to_sql_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(r) => SqlValue::Real(r),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(sql: &str) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(sql).unwrap();
        drop(conn);
        std::fs::read(path).unwrap()
    }

    #[test]
    fn test_query_value_types() {
        let bytes = image(
            "CREATE TABLE t (a, b, c, d);
             INSERT INTO t VALUES (1, 2.5, 'x', NULL);",
        );
        let engine = SqliteEngine;
        let handle = engine.open(&bytes).unwrap();
        let rows = engine.query(&handle, "SELECT a, b, c, d FROM t", &[]).unwrap();
        assert_eq!(
            rows,
            vec![vec![
                SqlValue::Integer(1),
                SqlValue::Real(2.5),
                SqlValue::Text("x".into()),
                SqlValue::Null,
            ]]
        );
    }

    #[test]
    fn test_query_binds_params() {
        let bytes = image(
            "CREATE TABLE t (name TEXT);
             INSERT INTO t VALUES ('a'), ('b');",
        );
        let engine = SqliteEngine;
        let handle = engine.open(&bytes).unwrap();
        let rows = engine
            .query(&handle, "SELECT name FROM t WHERE name = ?1", &["b"])
            .unwrap();
        assert_eq!(rows, vec![vec![SqlValue::Text("b".into())]]);
    }

    #[test]
    fn test_garbage_bytes_fail_on_query() {
        let engine = SqliteEngine;
        let handle = engine.open(b"definitely not sqlite, just some text padding it out").unwrap();
        let err = engine.query(&handle, "SELECT 1 FROM watchlist", &[]).unwrap_err();
        assert!(matches!(err, EngineError::Query(_)));
    }

    #[test]
    fn test_handle_is_read_only() {
        let bytes = image("CREATE TABLE t (a);");
        let engine = SqliteEngine;
        let handle = engine.open(&bytes).unwrap();
        let err = engine.query(&handle, "INSERT INTO t VALUES (1)", &[]);
        assert!(err.is_err());
    }
}

//! Common test utilities
#![allow(dead_code)] // Not every test file uses every helper

use std::path::PathBuf;

use rusqlite::{params, Connection};
use sensus_web_host::config::Config;
use sensus_web_host::store;
use tempfile::TempDir;

/// Temp directory holding a watchlist database
pub struct TestHarness {
    pub tmp_dir: TempDir,
    pub db_path: PathBuf,
}

impl TestHarness {
    /// New harness with an empty `watchlist` table
    pub fn new() -> anyhow::Result<Self> {
        let tmp_dir = tempfile::tempdir()?;
        let db_path = tmp_dir.path().join("sensusmundi.db");
        store::create_database(&db_path)?;
        Ok(Self { tmp_dir, db_path })
    }

    /// New harness whose database file does not exist
    pub fn without_database() -> anyhow::Result<Self> {
        let tmp_dir = tempfile::tempdir()?;
        let db_path = tmp_dir.path().join("missing.db");
        Ok(Self { tmp_dir, db_path })
    }

    pub fn insert(&self, country: &str, date: &str, watchlist: &str, urls: &str) {
        let conn = Connection::open(&self.db_path).unwrap();
        conn.execute(
            "INSERT INTO watchlist (country, date_added, watchlist, urls_used) VALUES (?1, ?2, ?3, ?4)",
            params![country, date, watchlist, urls],
        )
        .unwrap();
    }

    /// Overwrite the database file with arbitrary bytes
    pub fn corrupt(&self, bytes: &[u8]) {
        std::fs::write(&self.db_path, bytes).unwrap();
    }

    /// Config pointing at this harness's database
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.data.database_path.clone_from(&self.db_path);
        config
    }
}

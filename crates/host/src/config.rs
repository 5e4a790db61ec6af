//! Configuration system for sensus-web
//!
//! Reads config from ~/.config/sensus-web/config.toml

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sensus_web_watchlist::DEFAULT_COUNTRY;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            http_port: 8080,
        }
    }
}

/// Where the database lives and where the page loads sql.js from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub database_path: PathBuf,
    /// Base URL for both `sql-wasm.js` and `sql-wasm.wasm`
    pub sqljs_base: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("src/sensusmundi.db"),
            sqljs_base: "https://cdnjs.cloudflare.com/ajax/libs/sql.js/1.6.2/".to_string(),
        }
    }
}

/// Watchlist selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchlistConfig {
    pub country: String,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub watchlist: WatchlistConfig,
}

const DEFAULT_CONFIG: &str = r#"# sensus-web Configuration

[server]
bind = "127.0.0.1"
http_port = 8080

[data]
# Relative paths resolve against the working directory
database_path = "src/sensusmundi.db"
# sql.js distribution; the page loads sql-wasm.js and sql-wasm.wasm from here
sqljs_base = "https://cdnjs.cloudflare.com/ajax/libs/sql.js/1.6.2/"

[watchlist]
country = "NATO"
"#;

impl Config {
    /// Load configuration from default path
    pub fn load() -> Self {
        let config_path = Self::default_config_path();
        Self::load_from_path(&config_path).unwrap_or_default()
    }

    /// Get default config path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sensus-web")
            .join("config.toml")
    }

    /// Load from a specific path. `None` if the file is missing or invalid.
    pub fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to parse config: {e}");
                None
            }
        }
    }

    /// Create default config file if it doesn't exist
    pub fn create_default_if_missing() {
        let path = Self::default_config_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = std::fs::write(&path, DEFAULT_CONFIG) {
                tracing::debug!(path = %path.display(), "Could not write default config: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.watchlist.country, "NATO");
        assert_eq!(config.data.database_path, PathBuf::from("src/sensusmundi.db"));
    }

    #[test]
    fn test_default_file_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed.server.http_port, Config::default().server.http_port);
        assert_eq!(parsed.data.sqljs_base, Config::default().data.sqljs_base);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nhttp_port = 9090\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.server.http_port, 9090);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.watchlist.country, "NATO");
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nhttp_port = ").unwrap();
        assert!(Config::load_from_path(&path).is_none());
        assert!(Config::load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}

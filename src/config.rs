//! Configuration parsing for Restolist.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - A per-user data directory by default

use clap::Args;
use directories::ProjectDirs;
use std::path::PathBuf;

use crate::observability::tracing::LogFormat;
use crate::search::{MapSearch, DEFAULT_MAP_SEARCH_URL};
use crate::storage::{SavePolicy, Store, DB_FILE_NAME};

/// Used when no per-user data directory can be determined.
const FALLBACK_DATA_DIR: &str = "./data";

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Directory holding the restaurant database [default: per-user data dir]
    #[arg(short, long, global = true, env = "RESTOLIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, global = true, env = "RESTOLIST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// How saves apply their delete-then-insert sequence
    #[arg(long, global = true, env = "RESTOLIST_SAVE_POLICY", value_enum, default_value_t = SavePolicy::Atomic)]
    pub save_policy: SavePolicy,

    /// Map search endpoint; the query is appended to it
    #[arg(long, global = true, env = "RESTOLIST_MAP_SEARCH_URL", default_value = DEFAULT_MAP_SEARCH_URL)]
    pub map_search_url: String,
}

impl Config {
    /// Directory the database lives in.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Full path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.resolve_data_dir().join(DB_FILE_NAME)
    }

    /// Store configured from these options.
    pub fn store(&self) -> Store {
        Store::new(self.db_path()).with_policy(self.save_policy)
    }

    /// Map search configured from these options.
    pub fn map_search(&self) -> MapSearch {
        MapSearch::new(self.map_search_url.clone())
    }

    /// Create a configuration for testing.
    #[cfg(test)]
    pub fn test_config(data_dir: PathBuf) -> Self {
        Self {
            data_dir: Some(data_dir),
            log_level: "debug".into(),
            log_format: LogFormat::Text,
            save_policy: SavePolicy::Atomic,
            map_search_url: "http://maps.test/".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "warn".into(),
            log_format: LogFormat::Text,
            save_policy: SavePolicy::Atomic,
            map_search_url: DEFAULT_MAP_SEARCH_URL.into(),
        }
    }
}

/// Platform-standard per-user data directory.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "restolist", "Restolist")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.save_policy, SavePolicy::Atomic);
        assert_eq!(config.map_search_url, DEFAULT_MAP_SEARCH_URL);
        assert!(config.db_path().ends_with(DB_FILE_NAME));
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = Config::test_config(PathBuf::from("/tmp/restolist-test"));
        assert_eq!(
            config.db_path(),
            PathBuf::from("/tmp/restolist-test").join("Inventory.sqlite")
        );
        assert_eq!(config.store().path(), config.db_path());
        assert_eq!(config.map_search().base_url(), "http://maps.test/");
    }

    #[test]
    fn test_store_uses_configured_policy() {
        let mut config = Config::test_config(PathBuf::from("/tmp/restolist-test"));
        config.save_policy = SavePolicy::StatementWise;
        assert_eq!(config.store().policy(), SavePolicy::StatementWise);
    }
}

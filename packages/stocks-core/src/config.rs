//! Application configuration.

use crate::types::StockEntry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of recently viewed stocks kept per user.
pub const DEFAULT_RECENT_CAPACITY: usize = 5;

/// Settings shared by the session and the CLI.
///
/// Loaded from a TOML file; every key is optional:
///
/// ```toml
/// recent_capacity = 5
/// recent_dir = "/home/jo/.stocks/stock_info"
///
/// [default_stock]
/// name = "DOW Jones 30"
/// ticker = "^DJI"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Maximum recently viewed stocks per user
    pub recent_capacity: usize,
    /// Directory holding per-user recently viewed files
    pub recent_dir: PathBuf,
    /// Stock shown when a session starts
    pub default_stock: StockEntry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            recent_dir: Self::default_recent_dir(),
            default_stock: StockEntry::new("DOW Jones 30", "^DJI"),
        }
    }
}

impl Config {
    /// Get the default config file path.
    ///
    /// Default path: `~/.stocks/config.toml`
    /// Can be overridden with `STOCKS_CONFIG_FILE` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("STOCKS_CONFIG_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".stocks/config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Get the default directory for recently viewed files.
    pub fn default_recent_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".stocks/stock_info"))
            .unwrap_or_else(|| PathBuf::from("stock_info"))
    }

    /// Load from the default path, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_path(&Self::default_path())?;
        if let Ok(dir) = env::var("STOCKS_RECENT_DIR") {
            config.recent_dir = PathBuf::from(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific path. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the cache cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.recent_capacity == 0 {
            return Err(Error::InvalidCapacity(self.recent_capacity));
        }
        self.default_stock.validate()
    }
}

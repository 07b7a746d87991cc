//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file (first found, see below)
//! 3. CLI flags (applied by the CLI, not here)
//!
//! # Config Locations
//!
//! An explicit path (from `--config`) must exist. Otherwise these are
//! searched in order and the first existing file wins:
//! 1. `$PAGESTORE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/pagestore/config.toml`
//! 3. `~/.pagestore/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use pagestore::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("page size: {}", config.default_page_size());
//! if let Some(url) = config.base_url() {
//!     println!("api: {}", url);
//! }
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::paths;
use crate::core::types::DEFAULT_PAGE_SIZE;
use crate::page::reconcile::{DateNormalizer, DEFAULT_DATE_FORMAT};
use crate::resource::http::DEFAULT_TIMEOUT;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: FileConfig,
    /// Path the file section was loaded from, if any.
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit path is missing, or a found config
    /// file cannot be read, parsed, or validated. A missing config in the
    /// search locations is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => Self::load_first(&paths::config_candidates()),
        }
    }

    /// Load the first existing file among `candidates`, or defaults.
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|p| p.exists()) {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Read, parse and validate one config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// API base URL. No default.
    pub fn base_url(&self) -> Option<&str> {
        self.file.api.as_ref().and_then(|a| a.base_url.as_deref())
    }

    /// Request timeout. Defaults to 30 seconds.
    pub fn timeout(&self) -> Duration {
        self.file
            .api
            .as_ref()
            .and_then(|a| a.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Registry file path. Defaults to `~/.pagestore/tabs.json`.
    pub fn registry_path(&self) -> Result<PathBuf, ConfigError> {
        match self.file.registry.as_ref().and_then(|r| r.path.clone()) {
            Some(path) => Ok(path),
            None => paths::default_registry_path().ok_or(ConfigError::NoHomeDir),
        }
    }

    /// Page size of a fresh list query. Defaults to 100.
    pub fn default_page_size(&self) -> u32 {
        self.file
            .page
            .as_ref()
            .and_then(|p| p.default_page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Canonical date format. Defaults to `%Y-%m-%d %H:%M:%S`.
    pub fn date_format(&self) -> &str {
        self.file
            .dates
            .as_ref()
            .and_then(|d| d.format.as_deref())
            .unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Normalizer for the configured date format.
    pub fn date_normalizer(&self) -> Result<DateNormalizer, ConfigError> {
        DateNormalizer::new(self.date_format())
            .map_err(|e| ConfigError::InvalidValue(format!("dates.format: {}", e)))
    }
}

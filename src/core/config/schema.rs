//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: the API base URL must be http(s),
//! sizes and timeouts must be positive, and the date format must be a
//! valid strftime pattern.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::page::reconcile::DateNormalizer;

/// Configuration file contents.
///
/// # Example
///
/// ```toml
/// [api]
/// base_url = "http://localhost:8080/api/v1/example"
/// timeout_secs = 30
///
/// [registry]
/// path = "/home/me/.pagestore/tabs.json"
///
/// [page]
/// default_page_size = 100
///
/// [dates]
/// format = "%Y-%m-%d %H:%M:%S"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api: Option<ApiConfig>,
    pub registry: Option<RegistryConfig>,
    pub page: Option<PageConfig>,
    pub dates: Option<DatesConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(api) = &self.api {
            api.validate()?;
        }
        if let Some(page) = &self.page {
            page.validate()?;
        }
        if let Some(dates) = &self.dates {
            dates.validate()?;
        }
        Ok(())
    }
}

/// Remote resource settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL the list/detail/save endpoints hang off.
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            validate_base_url(url)?;
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Check that a base URL is an http(s) URL.
pub fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ConfigError::InvalidValue(format!(
            "api base url '{}' must start with http:// or https:// and name a host",
            url
        ))),
    }
}

/// Tab registry settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Registry file (default: `~/.pagestore/tabs.json`).
    pub path: Option<PathBuf>,
}

/// Page defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub default_page_size: Option<u32>,
}

impl PageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == Some(0) {
            return Err(ConfigError::InvalidValue(
                "page.default_page_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Date normalization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatesConfig {
    /// strftime pattern timestamps are rewritten to before saving.
    pub format: Option<String>,
}

impl DatesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.format {
            DateNormalizer::new(format.clone())
                .map_err(|e| ConfigError::InvalidValue(format!("dates.format: {}", e)))?;
        }
        Ok(())
    }
}

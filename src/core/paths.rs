//! core::paths
//!
//! Centralized path routing for pagestore's files.
//!
//! # Storage Layout
//!
//! User-level data lives under `~/.pagestore/`:
//! - `config.toml` - Configuration (canonical write location)
//! - `tabs.json` - File tab registry
//! - `tabs.lock` - Registry lock file
//!
//! # Config Search Order
//!
//! 1. `$PAGESTORE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/pagestore/config.toml`
//! 3. `~/.pagestore/config.toml`

use std::path::PathBuf;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PAGESTORE_CONFIG";

/// Directory name under the home directory.
pub const HOME_DIR_NAME: &str = ".pagestore";

/// Directory name under `$XDG_CONFIG_HOME`.
pub const XDG_DIR_NAME: &str = "pagestore";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const REGISTRY_FILE_NAME: &str = "tabs.json";

/// `~/.pagestore`, if the home directory is known.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HOME_DIR_NAME))
}

/// `~/.pagestore/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// `~/.pagestore/tabs.json`.
pub fn default_registry_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(REGISTRY_FILE_NAME))
}

/// Config file candidates in search order. Candidates need not exist.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }
    if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_home.is_empty() {
            candidates.push(
                PathBuf::from(xdg_home)
                    .join(XDG_DIR_NAME)
                    .join(CONFIG_FILE_NAME),
            );
        }
    }
    if let Some(path) = default_config_path() {
        candidates.push(path);
    }
    candidates
}

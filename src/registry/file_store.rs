//! registry::file_store
//!
//! File-backed tab registry.
//!
//! # Storage
//!
//! - `~/.pagestore/tabs.json` by default: one JSON object mapping route
//!   paths to metadata documents
//! - `<file>.lock` is held exclusively (`fs2`) around every
//!   read-modify-write so concurrent CLI invocations cannot lose updates
//! - Writes are atomic (write to temp file, then rename)
//!
//! # Example
//!
//! ```ignore
//! use pagestore::registry::{FileRegistry, TabRegistry};
//!
//! let registry = FileRegistry::new()?;
//! if let Some(doc) = registry.get(&route)? {
//!     // restore from doc
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde_json::Value;

use super::traits::{RegistryError, TabRegistry};
use crate::core::paths;
use crate::core::types::RoutePath;

type Entries = BTreeMap<RoutePath, Value>;

/// File-backed tab registry.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

/// Exclusive lock on the registry file, released on drop.
struct RegistryLock {
    file: File,
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl FileRegistry {
    /// Create a registry at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, RegistryError> {
        let path = paths::default_registry_path()
            .ok_or_else(|| RegistryError::ReadError("cannot determine home directory".into()))?;
        Ok(Self { path })
    }

    /// Create a registry at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path to the registry file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn ensure_parent(&self) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RegistryError::WriteError(format!("cannot create directory: {}", e)))?;
        }
        Ok(())
    }

    /// Block until the registry lock is held.
    fn lock(&self) -> Result<RegistryLock, RegistryError> {
        self.ensure_parent()?;
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                RegistryError::WriteError(format!("cannot open {}: {}", lock_path.display(), e))
            })?;

        match file.lock_exclusive() {
            Ok(()) => Ok(RegistryLock { file }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(RegistryError::Locked),
            Err(e) => Err(RegistryError::WriteError(format!("cannot lock registry: {}", e))),
        }
    }

    fn read_entries(&self) -> Result<Entries, RegistryError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| RegistryError::ReadError(format!("cannot read registry file: {}", e)))?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| RegistryError::ReadError(format!("cannot parse registry file: {}", e)))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), RegistryError> {
        self.ensure_parent()?;

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| RegistryError::WriteError(format!("cannot serialize registry: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| RegistryError::WriteError(format!("cannot create temp file: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| RegistryError::WriteError(format!("cannot write registry: {}", e)))?;
            file.sync_all()
                .map_err(|e| RegistryError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| RegistryError::WriteError(format!("cannot rename temp file: {}", e)))
    }

    fn modify(&self, f: impl FnOnce(&mut Entries)) -> Result<(), RegistryError> {
        let _lock = self.lock()?;
        let mut entries = self.read_entries()?;
        f(&mut entries);
        self.write_entries(&entries)
    }
}

impl TabRegistry for FileRegistry {
    fn get(&self, route: &RoutePath) -> Result<Option<Value>, RegistryError> {
        Ok(self.read_entries()?.remove(route))
    }

    fn set(&self, route: &RoutePath, document: Value) -> Result<(), RegistryError> {
        self.modify(|entries| {
            entries.insert(route.clone(), document);
        })
    }

    fn remove(&self, route: &RoutePath) -> Result<(), RegistryError> {
        self.modify(|entries| {
            entries.remove(route);
        })
    }

    fn routes(&self) -> Result<Vec<RoutePath>, RegistryError> {
        Ok(self.read_entries()?.into_keys().collect())
    }
}

//! registry::memory
//!
//! In-memory tab registry, shared by clones.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::traits::{RegistryError, TabRegistry};
use crate::core::types::RoutePath;

/// In-memory tab registry.
///
/// Clones share the same map, so a test can hand one clone to a store and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    entries: Arc<Mutex<BTreeMap<RoutePath, Value>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<RoutePath, Value>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TabRegistry for MemoryRegistry {
    fn get(&self, route: &RoutePath) -> Result<Option<Value>, RegistryError> {
        Ok(self.entries().get(route).cloned())
    }

    fn set(&self, route: &RoutePath, document: Value) -> Result<(), RegistryError> {
        self.entries().insert(route.clone(), document);
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn remove(&self, route: &RoutePath) -> Result<(), RegistryError> {
        self.entries().remove(route);
        Ok(())
    }

    fn routes(&self) -> Result<Vec<RoutePath>, RegistryError> {
        Ok(self.entries().keys().cloned().collect())
    }
}

//! registry::traits
//!
//! Tab registry trait definition.

use serde_json::Value;
use thiserror::Error;

use crate::core::types::RoutePath;

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to read from the registry.
    #[error("failed to read tab registry: {0}")]
    ReadError(String),

    /// Failed to write to the registry.
    #[error("failed to write tab registry: {0}")]
    WriteError(String),

    /// Another process holds the registry lock.
    #[error("tab registry is locked by another process")]
    Locked,
}

/// A shared, route-keyed store of page metadata documents.
///
/// The registry stands in for the host tab system: it keeps each open
/// page's last published snapshot so a store rebuilt for the same route
/// can pick up where it left off. A store only ever touches its own key.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
///
/// # Example
///
/// ```
/// use pagestore::core::types::RoutePath;
/// use pagestore::registry::{MemoryRegistry, TabRegistry};
/// use serde_json::json;
///
/// let registry = MemoryRegistry::new();
/// let route = RoutePath::new("/examples/list").unwrap();
///
/// assert!(registry.get(&route).unwrap().is_none());
/// registry.set(&route, json!({ "kind": "x" })).unwrap();
/// assert_eq!(registry.get(&route).unwrap(), Some(json!({ "kind": "x" })));
/// ```
pub trait TabRegistry: Send + Sync {
    /// Get the document filed under `route`.
    ///
    /// Returns `Ok(None)` if nothing has been published for the route.
    fn get(&self, route: &RoutePath) -> Result<Option<Value>, RegistryError>;

    /// File `document` under `route`, replacing any previous one.
    fn set(&self, route: &RoutePath, document: Value) -> Result<(), RegistryError>;

    /// Drop the document filed under `route`. Removing a missing key is not an error.
    fn remove(&self, route: &RoutePath) -> Result<(), RegistryError>;

    /// All routes with a filed document, sorted.
    fn routes(&self) -> Result<Vec<RoutePath>, RegistryError>;
}

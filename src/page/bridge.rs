//! page::bridge
//!
//! Metadata snapshot/restore bridge between a page store and the tab
//! registry.
//!
//! # Protocol
//!
//! - **Restore**: on construction, read the document filed under the
//!   store's route. A valid document seeds the snapshot; a missing one
//!   yields defaults; an unreadable one is logged and yields defaults.
//! - **Publish**: after a state change, compare the new snapshot with the
//!   last one published (field by field) and write only when something
//!   differs. Write failures are logged and otherwise ignored.
//!
//! The bridge remembers what it last published even when the write
//! failed, so a broken registry is not hammered with identical retries.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::metadata::{parse_document, to_document, PageMetadata};
use crate::core::types::{Entity, RoutePath};
use crate::registry::TabRegistry;

/// Outcome of a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publish {
    /// Nothing changed since the last publish.
    Unchanged,
    /// A document was written; carries the names of the changed fields.
    Written(Vec<&'static str>),
    /// A write was attempted and failed.
    Failed,
}

/// Connects one store to its registry key.
pub struct MetadataBridge<T: Entity> {
    route: RoutePath,
    registry: Arc<dyn TabRegistry>,
    last_published: PageMetadata<T>,
}

impl<T: Entity> std::fmt::Debug for MetadataBridge<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataBridge")
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

impl<T: Entity> MetadataBridge<T> {
    /// Open the bridge for `route` and restore its snapshot.
    ///
    /// Returns the bridge and the snapshot the store should start from.
    /// `defaults` is used when nothing valid was published for the route.
    pub fn restore(
        route: RoutePath,
        registry: Arc<dyn TabRegistry>,
        defaults: PageMetadata<T>,
    ) -> (Self, PageMetadata<T>) {
        let restored = match registry.get(&route) {
            Ok(Some(doc)) => match parse_document::<T>(&route, &doc) {
                Ok(meta) => {
                    debug!(route = %route, "restored page metadata");
                    Some(meta)
                }
                Err(e) => {
                    warn!(route = %route, error = %e, "ignoring unreadable page metadata");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(route = %route, error = %e, "cannot read tab registry");
                None
            }
        };

        // A restored snapshot is already what the registry holds; defaults
        // have never been published.
        let (initial, last_published) = match restored {
            Some(meta) => (meta.clone(), meta),
            None => (defaults.clone(), defaults),
        };

        let bridge = Self {
            route,
            registry,
            last_published,
        };
        (bridge, initial)
    }

    pub fn route(&self) -> &RoutePath {
        &self.route
    }

    /// The snapshot most recently handed to the registry.
    pub fn last_published(&self) -> &PageMetadata<T> {
        &self.last_published
    }

    /// Publish `current` if it differs from the last published snapshot.
    pub fn publish(&mut self, current: &PageMetadata<T>) -> Publish {
        let changed = current.changed_fields(&self.last_published);
        if changed.is_empty() {
            return Publish::Unchanged;
        }
        self.last_published = current.clone();

        let doc = match to_document(&self.route, current) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(route = %self.route, error = %e, "cannot serialize page metadata");
                return Publish::Failed;
            }
        };

        match self.registry.set(&self.route, doc) {
            Ok(()) => {
                debug!(route = %self.route, fields = ?changed, "published page metadata");
                Publish::Written(changed)
            }
            Err(e) => {
                warn!(route = %self.route, error = %e, "cannot publish page metadata");
                Publish::Failed
            }
        }
    }
}

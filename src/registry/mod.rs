//! registry
//!
//! Tab registry: where page stores file their metadata snapshots.
//!
//! # Architecture
//!
//! Stores talk to the registry through the [`TabRegistry`] trait:
//!
//! - [`MemoryRegistry`]: in-process map, used by tests and embedders
//! - [`FileRegistry`]: JSON file at `~/.pagestore/tabs.json` (default), used
//!   by the CLI so state carries across invocations
//!
//! Registry failures never abort a store operation; the store logs them
//! and carries on with its in-memory state.

mod file_store;
mod memory;
mod traits;

pub use file_store::FileRegistry;
pub use memory::MemoryRegistry;
pub use traits::{RegistryError, TabRegistry};

//! page
//!
//! The page state engine.
//!
//! # Modules
//!
//! - [`list`] - Row mapping, page summaries and row lookup
//! - [`form`] - Form lifecycle states
//! - [`staged`] - Staged create/edit/delete of child rows
//! - [`reconcile`] - Save payloads, command codes and date normalization
//! - [`bridge`] - Metadata restore and gated publish
//! - [`sequence`] - Request ordering and spinners
//! - [`store`] - The [`PageStore`] facade
//!
//! # Data Flow
//!
//! ```text
//! restore -> run_query -> rows -> select_row -> form + child rows
//!         -> child edits -> save (C/U/D) -> browsing
//! ```
//!
//! Every state change is followed by a publish to the tab registry when
//! the metadata snapshot changed.

pub mod bridge;
pub mod form;
pub mod list;
pub mod reconcile;
pub mod sequence;
pub mod staged;
pub mod store;

pub use bridge::{MetadataBridge, Publish};
pub use form::FormMode;
pub use reconcile::{DateFormatError, DateNormalizer};
pub use staged::StagedRows;
pub use store::{Outcome, PageError, PageStore, PageStoreBuilder};

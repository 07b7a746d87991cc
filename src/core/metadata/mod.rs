//! core::metadata
//!
//! Page metadata schema.
//!
//! # Modules
//!
//! - [`schema`] - Metadata snapshot type and registry document format (v1)
//!
//! # Architecture
//!
//! A page store publishes its metadata to the tab registry as a JSON
//! document keyed by route path. The document is self-describing so a
//! registry shared by many pages can be inspected without knowing which
//! entity type produced each entry.

pub mod schema;

pub use schema::{
    parse_document, to_document, MetadataError, PageMetadata, DEFAULT_FLEX_GROW, METADATA_KIND,
    SCHEMA_VERSION,
};

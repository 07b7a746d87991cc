//! core
//!
//! Core domain types, schemas, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RoutePath, RowKey, Row, ListQuery, etc.
//! - [`record`] - Schemaless JSON object entity
//! - [`metadata`] - Page metadata schema and registry document format
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Config and data file locations
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing

pub mod config;
pub mod metadata;
pub mod paths;
pub mod record;
pub mod types;

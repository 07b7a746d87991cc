//! Pagestore - state containers for list + detail + sub list pages
//!
//! A page store keeps the state of one admin-style page: a paginated,
//! filterable list; a form bound to the selected row; and an embedded
//! sub list whose row edits are staged and sent with the parent on save.
//! Its state is published to a route-keyed tab registry so a page can be
//! left and reopened where it was.
//!
//! # Architecture
//!
//! - [`cli`] - The `pgs` command-line interface
//! - [`page`] - The store and its state transitions
//! - [`core`] - Domain types, metadata schema, configuration and paths
//! - [`resource`] - List/detail/save endpoints (HTTP, mock, offline)
//! - [`registry`] - Tab registry backends (memory, file)
//! - [`ui`] - Output formatting and error reporting
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Correctness Invariants
//!
//! 1. A selection key always refers to a row that is present
//! 2. A response that is no longer the newest of its kind is never merged
//! 3. Remote failures leave the previous state in place
//! 4. The registry is written only when the snapshot changed

pub mod cli;
pub mod core;
pub mod logging;
pub mod page;
pub mod registry;
pub mod resource;
pub mod ui;

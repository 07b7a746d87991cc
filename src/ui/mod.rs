//! ui
//!
//! User-facing output and error reporting.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`report`] - Error reporters for failed store operations
//!
//! # Design
//!
//! All terminal output goes through this module so quiet mode and JSON
//! output are handled in one place.

pub mod output;
pub mod report;

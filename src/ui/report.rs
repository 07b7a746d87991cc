//! ui::report
//!
//! Error reporting for page stores.
//!
//! # Design
//!
//! Store operations never return remote failures to their caller. They
//! hand them to an [`ErrorReporter`] and keep their previous state. The
//! reporter is where a host decides how failures surface: a dialog, a log
//! line, a test assertion.
//!
//! - [`LogReporter`]: logs through `tracing` and optionally prints to stderr
//! - [`CollectingReporter`]: keeps every reported error for inspection
//!
//! # Example
//!
//! ```
//! use pagestore::page::PageError;
//! use pagestore::resource::ResourceError;
//! use pagestore::ui::report::{CollectingReporter, ErrorReporter};
//!
//! let reporter = CollectingReporter::new();
//! tokio_test::block_on(reporter.report(&PageError::List(ResourceError::NetworkError(
//!     "refused".into(),
//! ))));
//! assert_eq!(reporter.errors().len(), 1);
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::error;

use crate::page::PageError;
use crate::ui::output;

/// Receives failures from store operations.
///
/// The store awaits `report` and ignores its outcome.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(&self, error: &PageError);
}

/// Reporter that logs failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter {
    stderr: bool,
}

impl LogReporter {
    /// Log through `tracing` only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print each failure to stderr for interactive use.
    pub fn with_stderr() -> Self {
        Self { stderr: true }
    }
}

#[async_trait]
impl ErrorReporter for LogReporter {
    async fn report(&self, err: &PageError) {
        error!(operation = err.operation(), error = %err, "page operation failed");
        if self.stderr {
            output::error(err);
        }
    }
}

/// Reporter that records every failure.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    errors: Arc<Mutex<Vec<PageError>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every error reported so far, oldest first.
    pub fn errors(&self) -> Vec<PageError> {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Forget recorded errors.
    pub fn clear(&self) {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl ErrorReporter for CollectingReporter {
    async fn report(&self, err: &PageError) {
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(err.clone());
    }
}

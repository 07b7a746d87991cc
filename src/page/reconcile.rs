//! page::reconcile
//!
//! Turning staged state into a save request.
//!
//! # Command mapping
//!
//! | row status   | command |
//! |--------------|---------|
//! | `New`        | `C`     |
//! | `Edited`     | `U`     |
//! | `Unmodified` | `U`     |
//! | `Removed`    | `D`     |
//!
//! Unmodified rows are sent as updates; the server treats an update that
//! changes nothing as a no-op.
//!
//! # Dates
//!
//! [`DateNormalizer`] rewrites every RFC 3339 timestamp string in a JSON
//! payload into one canonical format before transmission.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use serde_json::Value;
use thiserror::Error;

use crate::core::types::{Entity, Row, RowStatus};
use crate::page::staged::StagedRows;
use crate::resource::{ChildCommand, RowCommand, SaveRequest};

/// Default canonical date format.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The command a row status reconciles to.
pub fn command_for(status: RowStatus) -> RowCommand {
    match status {
        RowStatus::New => RowCommand::Create,
        RowStatus::Edited | RowStatus::Unmodified => RowCommand::Update,
        RowStatus::Removed => RowCommand::Delete,
    }
}

/// Child commands for every staged row, in row order.
pub fn child_commands<C: Entity>(rows: &[Row<C>]) -> Vec<ChildCommand<C>> {
    rows.iter()
        .map(|row| ChildCommand {
            values: row.values.clone(),
            status: command_for(row.status),
        })
        .collect()
}

/// Build the save request for a form snapshot and its staged children.
///
/// An absent snapshot saves an empty entity.
pub fn build_save_request<T: Entity>(
    form: Option<&T>,
    children: &StagedRows<T::Child>,
) -> SaveRequest<T> {
    SaveRequest {
        form: form.cloned().unwrap_or_default(),
        sub_list: child_commands(children.as_slice()),
    }
}

/// Invalid date format string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date format '{0}'")]
pub struct DateFormatError(pub String);

/// Rewrites timestamps in a JSON value into a canonical format.
///
/// Only strings that parse as RFC 3339 are touched; the timestamp keeps
/// its own offset.
///
/// # Example
///
/// ```
/// use pagestore::page::reconcile::DateNormalizer;
/// use serde_json::json;
///
/// let normalizer = DateNormalizer::default();
/// let mut body = json!({ "createdAt": "2024-03-01T09:30:00Z", "name": "2024" });
/// normalizer.normalize(&mut body);
/// assert_eq!(body, json!({ "createdAt": "2024-03-01 09:30:00", "name": "2024" }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateNormalizer {
    format: String,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl DateNormalizer {
    /// Create a normalizer for a strftime-style format.
    ///
    /// # Errors
    ///
    /// Returns `DateFormatError` if the format contains an unknown specifier.
    pub fn new(format: impl Into<String>) -> Result<Self, DateFormatError> {
        let format = format.into();
        if format.is_empty() || StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(DateFormatError(format));
        }
        Ok(Self { format })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Rewrite every timestamp string in `value`, recursively.
    pub fn normalize(&self, value: &mut Value) {
        match value {
            Value::String(s) => {
                if let Some(formatted) = self.format_timestamp(s) {
                    *s = formatted;
                }
            }
            Value::Array(items) => items.iter_mut().for_each(|v| self.normalize(v)),
            Value::Object(map) => map.values_mut().for_each(|v| self.normalize(v)),
            _ => {}
        }
    }

    fn format_timestamp(&self, s: &str) -> Option<String> {
        let parsed = DateTime::parse_from_rfc3339(s).ok()?;
        let mut out = String::new();
        write!(out, "{}", parsed.format(&self.format)).ok()?;
        Some(out)
    }
}

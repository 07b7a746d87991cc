//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Parses command-specific arguments into store types
//! 2. Opens the store and calls one operation
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! List, select and save talk to the resource. Handlers stay synchronous
//! and drive those calls on a fresh tokio runtime.

mod child;
mod completion;
mod form;
mod layout;
mod list;
mod save;
mod show;

pub use child::child;
pub use completion::completion;
pub use form::{cancel, new, select, set};
pub use layout::{layout, reset};
pub use list::{list, page};
pub use save::save;
pub use show::show;

use std::future::Future;

use anyhow::{anyhow, bail, Result};
use serde_json::Value;

use crate::cli::args::Command;
use crate::cli::Context;
use crate::core::record::Record;
use crate::core::types::RowKey;
use crate::page::Outcome;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::List {
            filters,
            sort,
            size,
        } => list::list(ctx, &filters, &sort, size),
        Command::Page { number, size } => list::page(ctx, number, size),
        Command::Select { key, inline } => form::select(ctx, &key, inline),
        Command::New => form::new(ctx),
        Command::Cancel => form::cancel(ctx),
        Command::Set { assignments, json } => form::set(ctx, &assignments, json.as_deref()),
        Command::Child { action } => child::child(ctx, action),
        Command::Save { dry_run } => save::save(ctx, dry_run),
        Command::Show { json } => show::show(ctx, json),
        Command::Layout {
            col_widths,
            child_col_widths,
            flex_grow,
        } => layout::layout(ctx, col_widths, child_col_widths, flex_grow),
        Command::Reset => layout::reset(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Drive an async store call to completion.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(future))
}

/// Turn a store outcome into a command result.
///
/// The failure itself was already reported by the store.
fn check_outcome(outcome: Outcome, operation: &str, ctx: &Context) -> Result<()> {
    match outcome {
        Outcome::Applied => Ok(()),
        Outcome::Dropped => {
            output::warn(format!("{} had no effect", operation), ctx.verbosity);
            Ok(())
        }
        Outcome::Failed => bail!("{} failed", operation),
    }
}

/// Parse a row key: `#N` is a position, anything else an id.
fn parse_row_key(raw: &str) -> Result<RowKey> {
    match raw.strip_prefix('#') {
        Some(position) => position
            .parse()
            .map(RowKey::Position)
            .map_err(|_| anyhow!("invalid row position '{}'", raw)),
        None if raw.is_empty() => bail!("row key cannot be empty"),
        None => Ok(RowKey::Id(raw.to_string())),
    }
}

/// Split a `key=value` argument.
///
/// The value is read as JSON when it parses, otherwise as a string, so
/// `age=31` is a number and `name=kim` a string.
fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        bail!("empty key in '{}'", raw);
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Parse a JSON object argument into a record.
fn parse_record(raw: &str) -> Result<Record> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| anyhow!("invalid JSON '{}': {}", raw, e))?;
    Record::try_from(value).map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_keys() {
        assert_eq!(parse_row_key("42").unwrap(), RowKey::Id("42".into()));
        assert_eq!(parse_row_key("#3").unwrap(), RowKey::Position(3));
        assert!(parse_row_key("#x").is_err());
        assert!(parse_row_key("").is_err());
    }

    #[test]
    fn assignments_prefer_json() {
        assert_eq!(parse_assignment("age=31").unwrap(), ("age".into(), json!(31)));
        assert_eq!(parse_assignment("name=kim").unwrap(), ("name".into(), json!("kim")));
        assert_eq!(parse_assignment("ok=true").unwrap(), ("ok".into(), json!(true)));
        assert_eq!(parse_assignment("memo=").unwrap(), ("memo".into(), json!("")));
        assert!(parse_assignment("noequals").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn records_must_be_objects() {
        assert!(parse_record(r#"{"id": 1}"#).is_ok());
        assert!(parse_record("[1]").is_err());
        assert!(parse_record("{").is_err());
    }
}

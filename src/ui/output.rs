//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--json` is requested, output is machine-readable JSON.

use std::fmt::Display;

use crate::core::record::Record;
use crate::core::types::{PageSummary, Row, RowKey, RowStatus};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Verbose mode - extra detail
    Verbose,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose > 0 {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-letter marker for a row status.
pub fn status_marker(status: RowStatus) -> char {
    match status {
        RowStatus::Unmodified => ' ',
        RowStatus::New => '+',
        RowStatus::Edited => '~',
        RowStatus::Removed => '-',
    }
}

/// Render record rows, one per line.
///
/// ```text
/// * 1      {"id":1,"name":"kim"}
///   #1   + {"memo":"draft"}
/// ```
///
/// The selected row is starred; the key column is padded to the widest key.
pub fn format_rows(rows: &[Row<Record>], selected: Option<&RowKey>) -> String {
    use crate::core::types::Entity;

    let keys: Vec<RowKey> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| RowKey::for_entity(&row.values, i))
        .collect();
    let width = keys.iter().map(|k| k.to_string().len()).max().unwrap_or(0);

    rows.iter()
        .zip(&keys)
        .map(|(row, key)| {
            let marker = if selected == Some(key) { '*' } else { ' ' };
            let values = serde_json::to_string(&row.values.without_children())
                .unwrap_or_else(|_| "<unprintable>".to_string());
            format!(
                "{} {:<width$} {} {}",
                marker,
                key.to_string(),
                status_marker(row.status),
                values,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line pagination summary.
pub fn format_page(page: &PageSummary) -> String {
    format!(
        "page {}/{} ({} rows, page size {})",
        page.current_page, page.total_pages, page.total_elements, page.page_size
    )
}

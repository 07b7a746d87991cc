//! page::list
//!
//! List query results: row mapping, page summaries, and row lookup.
//!
//! # Fallbacks
//!
//! The list endpoint may omit any pagination field. The summary applies
//! these defaults and no others:
//!
//! | field            | source                     | fallback      |
//! |------------------|----------------------------|---------------|
//! | `current_page`   | `pageNumber`               | `1`           |
//! | `page_size`      | `pageSize`                 | `0`           |
//! | `total_pages`    | `pageCount`                | `0`           |
//! | `total_elements` | number of returned items   | (always)      |

use crate::core::types::{Entity, PageSummary, Row, RowKey};
use crate::resource::ListResponse;

impl PageSummary {
    /// Derive pagination figures from a list response.
    ///
    /// # Example
    ///
    /// ```
    /// use pagestore::core::record::Record;
    /// use pagestore::core::types::PageSummary;
    /// use pagestore::resource::ListResponse;
    ///
    /// let response: ListResponse<Record> = ListResponse::from_items(vec![Record::new()]);
    /// let summary = PageSummary::from_response(&response);
    /// assert_eq!(summary.current_page, 1);
    /// assert_eq!(summary.page_size, 0);
    /// assert_eq!(summary.total_elements, 1);
    /// ```
    pub fn from_response<T: Entity>(response: &ListResponse<T>) -> Self {
        Self {
            current_page: response.page_number.unwrap_or(1),
            page_size: response.page_size.unwrap_or(0),
            total_pages: response.page_count.unwrap_or(0),
            total_elements: response.items.len() as u64,
        }
    }
}

/// Wrap fetched entities as unmodified rows, preserving order.
pub fn rows_from_items<T: Entity>(items: Vec<T>) -> Vec<Row<T>> {
    items.into_iter().map(Row::new).collect()
}

/// Find the row identified by `key`, with its position.
pub fn find_row<'a, T: Entity>(rows: &'a [Row<T>], key: &RowKey) -> Option<(usize, &'a Row<T>)> {
    rows.iter()
        .enumerate()
        .find(|(i, row)| RowKey::for_entity(&row.values, *i) == *key)
}

/// Whether `key` identifies one of `rows`.
pub fn contains_key<T: Entity>(rows: &[Row<T>], key: &RowKey) -> bool {
    find_row(rows, key).is_some()
}

/// Keys of all rows, in order.
pub fn row_keys<T: Entity>(rows: &[Row<T>]) -> Vec<RowKey> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| RowKey::for_entity(&row.values, i))
        .collect()
}

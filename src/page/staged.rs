//! page::staged
//!
//! Staged mutations of an embedded child collection.
//!
//! # Design
//!
//! Child rows are edited client-side and only turned into server commands
//! at save time (see [`crate::page::reconcile`]). Each row carries one of
//! four statuses:
//!
//! ```text
//! (absent) --add--> New --remove--> (dropped)
//! Unmodified --edit--> Edited --remove--> Removed
//! Unmodified --remove--> Removed
//! ```
//!
//! `Removed` is terminal: removed rows stay in the collection so the save
//! can send a delete command, and edits never resurrect them. A `New` row
//! never becomes `Removed` because it has nothing to delete on the server.
//!
//! Every operation consumes the collection and returns the next one.
//!
//! # Example
//!
//! ```
//! use pagestore::core::types::RowStatus;
//! use pagestore::page::staged::StagedRows;
//!
//! let rows = StagedRows::hydrate(vec![10u32, 20]);
//! let rows = rows.add(vec![30]).edit(0, 11).remove(&[1, 2]);
//!
//! let statuses: Vec<_> = rows.iter().map(|r| r.status).collect();
//! assert_eq!(statuses, vec![RowStatus::Edited, RowStatus::Removed]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{Row, RowStatus};

/// An ordered collection of staged child rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StagedRows<C> {
    rows: Vec<Row<C>>,
}

impl<C> Default for StagedRows<C> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<C> StagedRows<C> {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows freshly loaded from a parent entity, all unmodified.
    pub fn hydrate(children: Vec<C>) -> Self {
        Self {
            rows: children.into_iter().map(Row::new).collect(),
        }
    }

    /// Wrap rows that already carry statuses (e.g. from a snapshot).
    pub fn from_rows(rows: Vec<Row<C>>) -> Self {
        Self { rows }
    }

    /// Unwrap into the underlying rows.
    pub fn into_rows(self) -> Vec<Row<C>> {
        self.rows
    }

    pub fn as_slice(&self) -> &[Row<C>] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row<C>> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row differs from what the server has.
    pub fn has_changes(&self) -> bool {
        self.rows.iter().any(|r| !r.status.is_unmodified())
    }

    /// Append entities as `New` rows, in order.
    pub fn add(mut self, entities: Vec<C>) -> Self {
        self.rows.extend(
            entities
                .into_iter()
                .map(|values| Row::with_status(values, RowStatus::New)),
        );
        self
    }

    /// Remove the rows at `indexes`.
    ///
    /// `New` rows are dropped outright; every other row becomes `Removed`.
    /// Indexes refer to positions before the call. Out-of-range indexes
    /// are ignored.
    pub fn remove(self, indexes: &[usize]) -> Self {
        let len = self.rows.len();
        for &index in indexes.iter().filter(|&&i| i >= len) {
            debug!(index, len, "ignoring out-of-range child index");
        }

        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .filter_map(|(i, mut row)| {
                if !indexes.contains(&i) {
                    return Some(row);
                }
                match row.status {
                    RowStatus::New => None,
                    _ => {
                        row.status = RowStatus::Removed;
                        Some(row)
                    }
                }
            })
            .collect();
        Self { rows }
    }

    /// Replace the values of the row at `index`.
    ///
    /// `Unmodified` rows become `Edited`; `New` and `Edited` keep their
    /// status. `Removed` rows and out-of-range indexes are left untouched.
    pub fn edit(mut self, index: usize, values: C) -> Self {
        match self.rows.get_mut(index) {
            Some(row) if row.status == RowStatus::Removed => {
                debug!(index, "ignoring edit of removed child row");
            }
            Some(row) => {
                row.values = values;
                if row.status == RowStatus::Unmodified {
                    row.status = RowStatus::Edited;
                }
            }
            None => {
                debug!(index, len = self.rows.len(), "ignoring out-of-range child edit");
            }
        }
        self
    }

    /// The collection as the server holds it after a successful save.
    ///
    /// `Removed` rows are dropped and every other row becomes `Unmodified`,
    /// so a second save sends no commands.
    pub fn settle(self) -> Self {
        let rows = self
            .rows
            .into_iter()
            .filter(|row| row.status != RowStatus::Removed)
            .map(|mut row| {
                row.status = RowStatus::Unmodified;
                row
            })
            .collect();
        Self { rows }
    }
}

impl<C> From<Vec<Row<C>>> for StagedRows<C> {
    fn from(rows: Vec<Row<C>>) -> Self {
        Self::from_rows(rows)
    }
}

impl<'a, C> IntoIterator for &'a StagedRows<C> {
    type Item = &'a Row<C>;
    type IntoIter = std::slice::Iter<'a, Row<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(rows: &StagedRows<&'static str>) -> Vec<RowStatus> {
        rows.iter().map(|r| r.status).collect()
    }

    #[test]
    fn hydrate_is_unmodified() {
        let rows = StagedRows::hydrate(vec!["a", "b"]);
        assert_eq!(statuses(&rows), vec![RowStatus::Unmodified; 2]);
        assert!(!rows.has_changes());
    }

    #[test]
    fn add_appends_new_in_order() {
        let rows = StagedRows::hydrate(vec!["a"]).add(vec!["b", "c"]);
        let values: Vec<_> = rows.iter().map(|r| r.values).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
        assert_eq!(
            statuses(&rows),
            vec![RowStatus::Unmodified, RowStatus::New, RowStatus::New]
        );
    }

    mod remove {
        use super::*;

        #[test]
        fn new_rows_are_dropped() {
            let rows = StagedRows::new().add(vec!["a", "b"]).remove(&[0]);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows.as_slice()[0].values, "b");
        }

        #[test]
        fn persisted_rows_are_marked() {
            let rows = StagedRows::hydrate(vec!["a", "b"]).edit(1, "B").remove(&[0, 1]);
            assert_eq!(statuses(&rows), vec![RowStatus::Removed, RowStatus::Removed]);
        }

        #[test]
        fn indexes_refer_to_positions_before_call() {
            let rows = StagedRows::new().add(vec!["a", "b", "c"]).remove(&[0, 2]);
            let values: Vec<_> = rows.iter().map(|r| r.values).collect();
            assert_eq!(values, vec!["b"]);
        }

        #[test]
        fn out_of_range_ignored() {
            let rows = StagedRows::hydrate(vec!["a"]).remove(&[5]);
            assert_eq!(statuses(&rows), vec![RowStatus::Unmodified]);
        }

        #[test]
        fn removing_twice_stays_removed() {
            let rows = StagedRows::hydrate(vec!["a"]).remove(&[0]).remove(&[0]);
            assert_eq!(statuses(&rows), vec![RowStatus::Removed]);
        }
    }

    mod edit {
        use super::*;

        #[test]
        fn unmodified_becomes_edited() {
            let rows = StagedRows::hydrate(vec!["a"]).edit(0, "A");
            assert_eq!(rows.as_slice()[0].values, "A");
            assert_eq!(statuses(&rows), vec![RowStatus::Edited]);
        }

        #[test]
        fn new_stays_new() {
            let rows = StagedRows::new().add(vec!["a"]).edit(0, "A");
            assert_eq!(statuses(&rows), vec![RowStatus::New]);
        }

        #[test]
        fn removed_is_untouched() {
            let rows = StagedRows::hydrate(vec!["a"]).remove(&[0]).edit(0, "A");
            assert_eq!(rows.as_slice()[0].values, "a");
            assert_eq!(statuses(&rows), vec![RowStatus::Removed]);
        }

        #[test]
        fn out_of_range_ignored() {
            let rows = StagedRows::hydrate(vec!["a"]).edit(3, "z");
            assert_eq!(rows.as_slice()[0].values, "a");
        }
    }

    #[test]
    fn settle_drops_removed_and_clears_statuses() {
        let rows = StagedRows::hydrate(vec!["a", "b", "c"])
            .add(vec!["d"])
            .edit(1, "B")
            .remove(&[2])
            .settle();

        let values: Vec<_> = rows.iter().map(|r| r.values).collect();
        assert_eq!(values, vec!["a", "B", "d"]);
        assert_eq!(statuses(&rows), vec![RowStatus::Unmodified; 3]);
        assert!(!rows.has_changes());
    }
}

//! core::metadata::schema
//!
//! Page metadata schema (v1).
//!
//! # Schema Design
//!
//! Page metadata is the serializable subset of a store's state that must
//! survive tab deactivation. Documents published to the tab registry are:
//! - Self-describing with `kind` and `schema_version`
//! - Bound to the route they were published for
//! - Strictly parsed (unknown fields rejected)
//!
//! Spinner flags are never part of the snapshot.
//!
//! # Example
//!
//! ```
//! use pagestore::core::metadata::schema::{parse_document, to_document, PageMetadata};
//! use pagestore::core::record::Record;
//! use pagestore::core::types::RoutePath;
//!
//! let route = RoutePath::new("/examples/list").unwrap();
//! let mut meta = PageMetadata::<Record>::default();
//! meta.list_col_widths = vec![120, 80];
//!
//! let doc = to_document(&route, &meta).unwrap();
//! let parsed: PageMetadata<Record> = parse_document(&route, &doc).unwrap();
//! assert_eq!(parsed, meta);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::types::{
    Entity, ListQuery, PageSummary, Row, RowKey, RoutePath, SortParam, TypeError,
};

/// The kind identifier for page metadata documents.
pub const METADATA_KIND: &str = "pagestore.page-metadata";

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Default layout ratio between the list and form panes.
pub const DEFAULT_FLEX_GROW: f64 = 1.0;

/// Errors from metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to parse metadata: {0}")]
    ParseError(String),

    #[error("failed to serialize metadata: {0}")]
    SerializeError(String),

    #[error("invalid kind '{found}', expected '{}'", METADATA_KIND)]
    InvalidKind { found: String },

    #[error("unsupported schema version {0}, supported: {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),

    #[error("metadata was published for route '{found}', expected '{expected}'")]
    RouteMismatch { expected: String, found: String },

    #[error("invalid metadata value: {0}")]
    InvalidValue(String),

    #[error("type validation failed: {0}")]
    TypeError(#[from] TypeError),
}

/// Envelope for version dispatch before full parsing.
#[derive(Debug, Deserialize)]
struct DocumentEnvelope {
    kind: String,
    schema_version: u32,
}

/// A metadata document as filed in the tab registry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(bound(serialize = "T: Entity", deserialize = "T: Entity"))]
struct MetadataDocumentV1<T: Entity> {
    kind: String,
    schema_version: u32,
    route: RoutePath,
    page: PageMetadata<T>,
}

/// Snapshot of a page store's visible state.
///
/// Every field here is restored verbatim when a store is rebuilt for the
/// same route. List rows and the page summary are included so a restored
/// selection key still refers to a row that exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(bound(serialize = "T: Entity", deserialize = "T: Entity"))]
pub struct PageMetadata<T: Entity> {
    pub list_query: ListQuery,
    pub list_col_widths: Vec<u32>,
    pub list_sort_params: Vec<SortParam>,
    pub list_selected_row_key: Option<RowKey>,
    pub list_rows: Vec<Row<T>>,
    pub list_page: PageSummary,
    /// Layout ratio of the list pane.
    pub flex_grow: f64,
    /// Editable form snapshot; `None` is the empty form.
    pub form: Option<T>,
    /// The entity the form was opened from.
    pub detail: Option<T>,
    pub form_active: bool,
    pub sub_list_col_widths: Vec<u32>,
    pub sub_list_selected_row_key: Option<RowKey>,
    pub sub_list_checked_indexes: Vec<usize>,
    pub sub_list_rows: Vec<Row<T::Child>>,
}

impl<T: Entity> Default for PageMetadata<T> {
    fn default() -> Self {
        Self {
            list_query: ListQuery::default(),
            list_col_widths: Vec::new(),
            list_sort_params: Vec::new(),
            list_selected_row_key: None,
            list_rows: Vec::new(),
            list_page: PageSummary::default(),
            flex_grow: DEFAULT_FLEX_GROW,
            form: None,
            detail: None,
            form_active: false,
            sub_list_col_widths: Vec::new(),
            sub_list_selected_row_key: None,
            sub_list_checked_indexes: Vec::new(),
            sub_list_rows: Vec::new(),
        }
    }
}

impl<T: Entity> PageMetadata<T> {
    /// Defaults with a specific first-page size.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            list_query: ListQuery::with_page_size(page_size),
            ..Self::default()
        }
    }

    /// Names of the fields that differ between `self` and `other`.
    ///
    /// Compared one field at a time so the publish gate never depends on
    /// allocation identity.
    pub fn changed_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.list_query != other.list_query {
            changed.push("list_query");
        }
        if self.list_col_widths != other.list_col_widths {
            changed.push("list_col_widths");
        }
        if self.list_sort_params != other.list_sort_params {
            changed.push("list_sort_params");
        }
        if self.list_selected_row_key != other.list_selected_row_key {
            changed.push("list_selected_row_key");
        }
        if self.list_rows != other.list_rows {
            changed.push("list_rows");
        }
        if self.list_page != other.list_page {
            changed.push("list_page");
        }
        if self.flex_grow.to_bits() != other.flex_grow.to_bits() {
            changed.push("flex_grow");
        }
        if self.form != other.form {
            changed.push("form");
        }
        if self.detail != other.detail {
            changed.push("detail");
        }
        if self.form_active != other.form_active {
            changed.push("form_active");
        }
        if self.sub_list_col_widths != other.sub_list_col_widths {
            changed.push("sub_list_col_widths");
        }
        if self.sub_list_selected_row_key != other.sub_list_selected_row_key {
            changed.push("sub_list_selected_row_key");
        }
        if self.sub_list_checked_indexes != other.sub_list_checked_indexes {
            changed.push("sub_list_checked_indexes");
        }
        if self.sub_list_rows != other.sub_list_rows {
            changed.push("sub_list_rows");
        }
        changed
    }

    /// Validate cross-field invariants.
    ///
    /// - The selected list key must be a key of one of the list rows
    /// - Checked child indexes must be in range
    /// - The layout ratio must be finite and non-negative
    pub fn validate(&self) -> Result<(), MetadataError> {
        if let Some(key) = &self.list_selected_row_key {
            let present = self
                .list_rows
                .iter()
                .enumerate()
                .any(|(i, row)| RowKey::for_entity(&row.values, i) == *key);
            if !present {
                return Err(MetadataError::InvalidValue(format!(
                    "selected row '{}' is not in the list rows",
                    key
                )));
            }
        }

        let len = self.sub_list_rows.len();
        if let Some(bad) = self.sub_list_checked_indexes.iter().find(|&&i| i >= len) {
            return Err(MetadataError::InvalidValue(format!(
                "checked sub list index {} out of range (len {})",
                bad, len
            )));
        }

        if !self.flex_grow.is_finite() || self.flex_grow < 0.0 {
            return Err(MetadataError::InvalidValue(format!(
                "flex grow must be a non-negative number, got {}",
                self.flex_grow
            )));
        }

        Ok(())
    }
}

/// Wrap metadata into a registry document for `route`.
///
/// # Errors
///
/// Returns `MetadataError::SerializeError` if an entity fails to serialize.
pub fn to_document<T: Entity>(
    route: &RoutePath,
    metadata: &PageMetadata<T>,
) -> Result<Value, MetadataError> {
    let doc = MetadataDocumentV1 {
        kind: METADATA_KIND.to_string(),
        schema_version: SCHEMA_VERSION,
        route: route.clone(),
        page: metadata.clone(),
    };
    serde_json::to_value(&doc).map_err(|e| MetadataError::SerializeError(e.to_string()))
}

/// Parse a registry document with version dispatch.
///
/// # Errors
///
/// Returns an error if:
/// - The document is malformed or has unknown fields
/// - The `kind` field doesn't match [`METADATA_KIND`]
/// - The `schema_version` is not supported
/// - The document was published for a different route
/// - Cross-field invariants do not hold
pub fn parse_document<T: Entity>(
    route: &RoutePath,
    doc: &Value,
) -> Result<PageMetadata<T>, MetadataError> {
    let envelope: DocumentEnvelope = serde_json::from_value(doc.clone())
        .map_err(|e| MetadataError::ParseError(e.to_string()))?;

    if envelope.kind != METADATA_KIND {
        return Err(MetadataError::InvalidKind {
            found: envelope.kind,
        });
    }

    match envelope.schema_version {
        1 => {
            let parsed: MetadataDocumentV1<T> = serde_json::from_value(doc.clone())
                .map_err(|e| MetadataError::ParseError(e.to_string()))?;
            if parsed.route != *route {
                return Err(MetadataError::RouteMismatch {
                    expected: route.to_string(),
                    found: parsed.route.to_string(),
                });
            }
            parsed.page.validate()?;
            Ok(parsed.page)
        }
        v => Err(MetadataError::UnsupportedVersion(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Record;
    use crate::core::types::RowStatus;
    use serde_json::json;

    fn route() -> RoutePath {
        RoutePath::new("/examples/list-with-form-list").unwrap()
    }

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    fn populated() -> PageMetadata<Record> {
        PageMetadata {
            list_col_widths: vec![100, 200],
            list_sort_params: vec!["name:desc".parse().unwrap()],
            list_selected_row_key: Some(RowKey::Id("1".into())),
            list_rows: vec![Row::new(record(json!({ "id": 1, "name": "a" })))],
            list_page: PageSummary {
                current_page: 1,
                page_size: 100,
                total_pages: 1,
                total_elements: 1,
            },
            flex_grow: 0.35,
            form: Some(record(json!({ "id": 1, "name": "a" }))),
            detail: Some(record(json!({ "id": 1, "name": "a" }))),
            form_active: true,
            sub_list_col_widths: vec![60],
            sub_list_selected_row_key: Some(RowKey::Position(0)),
            sub_list_checked_indexes: vec![0],
            sub_list_rows: vec![Row::with_status(
                record(json!({ "memo": "x" })),
                RowStatus::New,
            )],
            ..PageMetadata::default()
        }
    }

    mod document {
        use super::*;

        #[test]
        fn roundtrip() {
            let meta = populated();
            let doc = to_document(&route(), &meta).unwrap();
            assert_eq!(doc["kind"], json!(METADATA_KIND));
            assert_eq!(doc["schema_version"], json!(1));
            let parsed: PageMetadata<Record> = parse_document(&route(), &doc).unwrap();
            assert_eq!(parsed, meta);
        }

        #[test]
        fn invalid_kind() {
            let doc = json!({ "kind": "other", "schema_version": 1 });
            let result = parse_document::<Record>(&route(), &doc);
            assert!(matches!(result, Err(MetadataError::InvalidKind { .. })));
        }

        #[test]
        fn unsupported_version() {
            let doc = json!({ "kind": METADATA_KIND, "schema_version": 99 });
            let result = parse_document::<Record>(&route(), &doc);
            assert!(matches!(result, Err(MetadataError::UnsupportedVersion(99))));
        }

        #[test]
        fn route_mismatch() {
            let doc = to_document(&route(), &populated()).unwrap();
            let other = RoutePath::new("/other").unwrap();
            let result = parse_document::<Record>(&other, &doc);
            assert!(matches!(result, Err(MetadataError::RouteMismatch { .. })));
        }

        #[test]
        fn unknown_field_rejected() {
            let mut doc = to_document(&route(), &populated()).unwrap();
            doc["page"]["list_spinning"] = json!(true);
            let result = parse_document::<Record>(&route(), &doc);
            assert!(matches!(result, Err(MetadataError::ParseError(_))));
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn defaults_are_valid() {
            assert!(PageMetadata::<Record>::default().validate().is_ok());
        }

        #[test]
        fn dangling_selection_rejected() {
            let mut meta = populated();
            meta.list_selected_row_key = Some(RowKey::Id("404".into()));
            assert!(matches!(
                meta.validate(),
                Err(MetadataError::InvalidValue(_))
            ));
        }

        #[test]
        fn checked_index_out_of_range_rejected() {
            let mut meta = populated();
            meta.sub_list_checked_indexes = vec![5];
            assert!(meta.validate().is_err());
        }

        #[test]
        fn negative_flex_grow_rejected() {
            let mut meta = populated();
            meta.flex_grow = -1.0;
            assert!(meta.validate().is_err());
        }
    }

    mod changed_fields {
        use super::*;

        #[test]
        fn identical_snapshots_have_no_changes() {
            assert!(populated().changed_fields(&populated()).is_empty());
        }

        #[test]
        fn reports_each_changed_field() {
            let a = populated();
            let mut b = populated();
            b.form_active = false;
            b.sub_list_checked_indexes.clear();
            assert_eq!(
                a.changed_fields(&b),
                vec!["form_active", "sub_list_checked_indexes"]
            );
        }
    }
}

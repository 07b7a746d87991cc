//! core::types
//!
//! Strong types for the page-store domain.
//!
//! # Types
//!
//! - [`RoutePath`] - Validated route identity a store files its snapshot under
//! - [`RowKey`] - Stable identity of a grid row
//! - [`RowStatus`] / [`Row`] - Entity wrapper carrying a staged mutation status
//! - [`SortParam`] / [`ListQuery`] - Query state sent to the list endpoint
//! - [`PageSummary`] - Pagination figures derived from a list response
//! - [`Entity`] - Trait every domain type managed by a store implements
//!
//! # Validation
//!
//! Route paths are validated at construction time. Invalid values
//! cannot be represented, so a store can never publish under a bogus key.
//!
//! # Examples
//!
//! ```
//! use pagestore::core::types::{ListQuery, RoutePath, Row, RowStatus};
//!
//! let route = RoutePath::new("/examples/list-with-form-list").unwrap();
//! assert_eq!(route.as_str(), "/examples/list-with-form-list");
//! assert!(RoutePath::new("no-leading-slash").is_err());
//!
//! let query = ListQuery::default();
//! assert_eq!((query.page_number, query.page_size), (1, 100));
//!
//! let row = Row::new(42u32);
//! assert_eq!(row.status, RowStatus::Unmodified);
//! ```

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid route path: {0}")]
    InvalidRoutePath(String),

    #[error("invalid sort param: {0}")]
    InvalidSortParam(String),
}

/// A validated route path.
///
/// Route paths identify a page in the host tab system. They must:
/// - Start with `/`
/// - Not contain whitespace or ASCII control characters
/// - Not contain `//`
///
/// # Example
///
/// ```
/// use pagestore::core::types::RoutePath;
///
/// let route = RoutePath::new("/examples/list-with-form-row").unwrap();
/// assert_eq!(route.to_string(), "/examples/list-with-form-row");
///
/// assert!(RoutePath::new("").is_err());
/// assert!(RoutePath::new("/has space").is_err());
/// assert!(RoutePath::new("/a//b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Create a new validated route path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRoutePath` if the path is malformed.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        Self::validate(&path)?;
        Ok(Self(path))
    }

    fn validate(path: &str) -> Result<(), TypeError> {
        if path.is_empty() {
            return Err(TypeError::InvalidRoutePath(
                "route path cannot be empty".into(),
            ));
        }
        if !path.starts_with('/') {
            return Err(TypeError::InvalidRoutePath(format!(
                "route path must start with '/': {path}"
            )));
        }
        if path.contains("//") {
            return Err(TypeError::InvalidRoutePath(
                "route path cannot contain '//'".into(),
            ));
        }
        if path
            .chars()
            .any(|c| c.is_whitespace() || c.is_ascii_control())
        {
            return Err(TypeError::InvalidRoutePath(
                "route path cannot contain whitespace or control characters".into(),
            ));
        }
        Ok(())
    }

    /// Get the route path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoutePath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RoutePath> for String {
    fn from(route: RoutePath) -> Self {
        route.0
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a row in a grid.
///
/// Persisted entities are keyed by their id. Rows that have no id yet
/// (created in-session, or entities without an id field) fall back to
/// their position in the row set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKey {
    /// Entity id.
    Id(String),
    /// Positional index.
    Position(usize),
}

impl RowKey {
    /// Build the key for an entity at `position`.
    pub fn for_entity<T: Entity>(entity: &T, position: usize) -> Self {
        match entity.id() {
            Some(id) => RowKey::Id(id),
            None => RowKey::Position(position),
        }
    }

    /// The entity id, if this key carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            RowKey::Id(id) => Some(id),
            RowKey::Position(_) => None,
        }
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKey::Id(id) => write!(f, "{}", id),
            RowKey::Position(pos) => write!(f, "#{}", pos),
        }
    }
}

/// Staged mutation status of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Loaded from the server and untouched.
    #[default]
    Unmodified,
    /// Created in this session; has no server-side counterpart.
    New,
    /// Exists on the server and has been changed locally.
    Edited,
    /// Exists on the server and is marked for deletion.
    Removed,
}

impl RowStatus {
    /// Whether this is the default status.
    pub fn is_unmodified(&self) -> bool {
        matches!(self, RowStatus::Unmodified)
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowStatus::Unmodified => write!(f, "unmodified"),
            RowStatus::New => write!(f, "new"),
            RowStatus::Edited => write!(f, "edited"),
            RowStatus::Removed => write!(f, "removed"),
        }
    }
}

/// A domain entity wrapped with its staged mutation status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row<T> {
    /// The wrapped entity.
    pub values: T,
    /// Mutation status (omitted on the wire when unmodified).
    #[serde(default, skip_serializing_if = "RowStatus::is_unmodified")]
    pub status: RowStatus,
}

impl<T> Row<T> {
    /// Wrap an entity as an unmodified row.
    pub fn new(values: T) -> Self {
        Self {
            values,
            status: RowStatus::Unmodified,
        }
    }

    /// Wrap an entity with an explicit status.
    pub fn with_status(values: T, status: RowStatus) -> Self {
        Self { values, status }
    }
}

/// Sort direction of a grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// One sort specification: a field and its direction.
///
/// Parses from `field` or `field:asc` / `field:desc`.
///
/// # Example
///
/// ```
/// use pagestore::core::types::{SortDirection, SortParam};
///
/// let param: SortParam = "createdAt:desc".parse().unwrap();
/// assert_eq!(param.field, "createdAt");
/// assert_eq!(param.direction, SortDirection::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortParam {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl std::str::FromStr for SortParam {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some((_, other)) => {
                return Err(TypeError::InvalidSortParam(format!(
                    "unknown direction '{other}', expected asc or desc"
                )))
            }
            None => (s, SortDirection::Asc),
        };
        if field.is_empty() {
            return Err(TypeError::InvalidSortParam("field cannot be empty".into()));
        }
        Ok(SortParam {
            field: field.to_string(),
            direction,
        })
    }
}

impl std::fmt::Display for SortParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.field, self.direction)
    }
}

/// Default page size for a fresh list query.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// The active list query.
///
/// Filter fields are flattened next to the pagination fields on the wire,
/// matching the list endpoint's request shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// 1-based page number.
    pub page_number: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Ordered sort specifications.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortParam>,
    /// Free-form filter fields.
    #[serde(flatten)]
    pub filters: BTreeMap<String, serde_json::Value>,
}

impl ListQuery {
    /// A first-page query with the given page size.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Merge pagination fields into a copy of this query.
    ///
    /// A missing page size keeps the current one.
    pub fn paged(&self, page_number: u32, page_size: Option<u32>) -> Self {
        Self {
            page_number,
            page_size: page_size.unwrap_or(self.page_size),
            ..self.clone()
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
            filters: BTreeMap::new(),
        }
    }
}

/// Pagination figures derived from a list response.
///
/// Never edited directly; see `PageSummary::from_response` in
/// [`crate::page::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageSummary {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

/// A domain entity managed by a page store.
///
/// Entities are plain serializable values. A store needs to know how to
/// identify an entity and, for pages with an embedded sub list, how to
/// reach the nested child collection.
///
/// Entities without children use [`NoChild`] as their `Child` type.
pub trait Entity:
    Clone + PartialEq + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Entity type of the nested child collection.
    type Child: Entity;

    /// Server-side id, if persisted.
    fn id(&self) -> Option<String>;

    /// The nested child collection carried inline by this entity.
    fn children(&self) -> Vec<Self::Child> {
        Vec::new()
    }

    /// A copy of this entity with the nested child collection removed.
    ///
    /// Used for the form snapshot, which edits the parent fields only.
    fn without_children(&self) -> Self {
        self.clone()
    }
}

/// Child type for entities without a nested collection.
///
/// Such entities never report children, so no `NoChild` value is ever
/// stored in a row set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoChild {}

impl Entity for NoChild {
    type Child = NoChild;

    fn id(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod route_path {
        use super::*;

        #[test]
        fn valid_paths() {
            assert!(RoutePath::new("/").is_ok());
            assert!(RoutePath::new("/examples").is_ok());
            assert!(RoutePath::new("/examples/list-with-form-list").is_ok());
            assert!(RoutePath::new("/users/:id/detail").is_ok());
        }

        #[test]
        fn rejects_empty() {
            assert!(matches!(
                RoutePath::new(""),
                Err(TypeError::InvalidRoutePath(_))
            ));
        }

        #[test]
        fn rejects_relative() {
            assert!(RoutePath::new("examples").is_err());
        }

        #[test]
        fn rejects_whitespace_and_control() {
            assert!(RoutePath::new("/a b").is_err());
            assert!(RoutePath::new("/a\tb").is_err());
            assert!(RoutePath::new("/a\u{7f}").is_err());
        }

        #[test]
        fn serde_roundtrip() {
            let route = RoutePath::new("/examples/list").unwrap();
            let json = serde_json::to_string(&route).unwrap();
            assert_eq!(json, "\"/examples/list\"");
            let parsed: RoutePath = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, route);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<RoutePath, _> = serde_json::from_str("\"nope\"");
            assert!(result.is_err());
        }
    }

    mod row_key {
        use super::*;

        #[test]
        fn display() {
            assert_eq!(RowKey::Id("42".into()).to_string(), "42");
            assert_eq!(RowKey::Position(3).to_string(), "#3");
        }

        #[test]
        fn id_accessor() {
            assert_eq!(RowKey::Id("a".into()).id(), Some("a"));
            assert_eq!(RowKey::Position(0).id(), None);
        }

        #[test]
        fn serde_shape() {
            let json = serde_json::to_string(&RowKey::Id("7".into())).unwrap();
            assert_eq!(json, r#"{"id":"7"}"#);
            let json = serde_json::to_string(&RowKey::Position(2)).unwrap();
            assert_eq!(json, r#"{"position":2}"#);
        }
    }

    mod row {
        use super::*;

        #[test]
        fn unmodified_status_omitted() {
            let row = Row::new(1u8);
            let json = serde_json::to_value(&row).unwrap();
            assert_eq!(json, serde_json::json!({ "values": 1 }));
        }

        #[test]
        fn missing_status_defaults_to_unmodified() {
            let row: Row<u8> = serde_json::from_str(r#"{"values":5}"#).unwrap();
            assert_eq!(row.status, RowStatus::Unmodified);
        }

        #[test]
        fn explicit_status_kept() {
            let row = Row::with_status(1u8, RowStatus::Removed);
            let json = serde_json::to_string(&row).unwrap();
            assert_eq!(json, r#"{"values":1,"status":"removed"}"#);
        }
    }

    mod sort_param {
        use super::*;

        #[test]
        fn parse_variants() {
            let p: SortParam = "name".parse().unwrap();
            assert_eq!(p.direction, SortDirection::Asc);
            let p: SortParam = "name:desc".parse().unwrap();
            assert_eq!(p.direction, SortDirection::Desc);
        }

        #[test]
        fn parse_rejects_bad_direction() {
            assert!("name:sideways".parse::<SortParam>().is_err());
            assert!(":asc".parse::<SortParam>().is_err());
        }

        #[test]
        fn display_roundtrip() {
            let p: SortParam = "age:desc".parse().unwrap();
            assert_eq!(p.to_string().parse::<SortParam>().unwrap(), p);
        }
    }

    mod list_query {
        use super::*;

        #[test]
        fn default_is_first_page() {
            let q = ListQuery::default();
            assert_eq!(q.page_number, 1);
            assert_eq!(q.page_size, DEFAULT_PAGE_SIZE);
            assert!(q.filters.is_empty());
        }

        #[test]
        fn paged_keeps_size_when_absent() {
            let mut q = ListQuery::with_page_size(20);
            q.filters.insert("name".into(), serde_json::json!("kim"));
            let next = q.paged(3, None);
            assert_eq!(next.page_number, 3);
            assert_eq!(next.page_size, 20);
            assert_eq!(next.filters, q.filters);

            let resized = q.paged(1, Some(50));
            assert_eq!(resized.page_size, 50);
        }

        #[test]
        fn filters_flatten_on_wire() {
            let mut q = ListQuery::default();
            q.filters.insert("name".into(), serde_json::json!("kim"));
            let json = serde_json::to_value(&q).unwrap();
            assert_eq!(
                json,
                serde_json::json!({ "pageNumber": 1, "pageSize": 100, "name": "kim" })
            );
        }
    }
}

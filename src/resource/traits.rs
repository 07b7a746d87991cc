//! resource::traits
//!
//! Resource trait definition for the remote list/detail/save endpoints.
//!
//! # Design
//!
//! The `Resource` trait is async because every operation involves network
//! I/O. All methods return `Result` so a store can report failures without
//! losing local state.
//!
//! Request and response shapes are explicit types. Unknown response fields
//! are rejected at the boundary; the only defaults applied to a response
//! are the documented page-summary fallbacks in [`crate::page::list`].
//!
//! # Example
//!
//! ```ignore
//! use pagestore::resource::{Resource, DetailRequest};
//!
//! async fn load(resource: &dyn Resource<Record>) -> Result<(), ResourceError> {
//!     let page = resource.list(&ListQuery::default()).await?;
//!     println!("{} rows", page.items.len());
//!
//!     let detail = resource.detail(&DetailRequest { id: "42".into() }).await?;
//!     println!("{:?}", detail.result);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Entity, ListQuery};

/// Errors from resource operations.
#[derive(Debug, Clone, Error)]
pub enum ResourceError {
    /// The requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote side returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A request or response body did not match the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The operation is not supported by this resource.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Response of the list endpoint.
///
/// Pagination fields are optional on the wire; see
/// `PageSummary::from_response` for how absent values are filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[serde(bound(serialize = "T: Entity", deserialize = "T: Entity"))]
pub struct ListResponse<T: Entity> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl<T: Entity> ListResponse<T> {
    /// A response carrying only items, without pagination fields.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            page_number: None,
            page_size: None,
            page_count: None,
        }
    }
}

/// Request for the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailRequest {
    pub id: String,
}

/// Response of the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(bound(serialize = "T: Entity", deserialize = "T: Entity"))]
pub struct DetailResponse<T: Entity> {
    pub result: T,
}

/// Opaque response of the save endpoint.
pub type SaveResponse = serde_json::Value;

/// Command code sent with each child row on save.
///
/// The wire taxonomy is fixed and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowCommand {
    #[serde(rename = "C")]
    Create,
    #[serde(rename = "U")]
    Update,
    #[serde(rename = "D")]
    Delete,
}

impl RowCommand {
    /// The wire code.
    pub fn code(&self) -> &'static str {
        match self {
            RowCommand::Create => "C",
            RowCommand::Update => "U",
            RowCommand::Delete => "D",
        }
    }
}

impl std::fmt::Display for RowCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A child entity tagged with the command the server should apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Entity", deserialize = "C: Entity"))]
pub struct ChildCommand<C: Entity> {
    #[serde(flatten)]
    pub values: C,
    pub status: RowCommand,
}

/// Payload of the save endpoint.
///
/// The form fields are flattened at the top level; child commands travel
/// in `subList` and are omitted when there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Entity", deserialize = "T: Entity"))]
pub struct SaveRequest<T: Entity> {
    #[serde(flatten)]
    pub form: T,
    #[serde(rename = "subList", default, skip_serializing_if = "Vec::is_empty")]
    pub sub_list: Vec<ChildCommand<T::Child>>,
}

impl<T: Entity> SaveRequest<T> {
    /// A save request for a form without child commands.
    pub fn form_only(form: T) -> Self {
        Self {
            form,
            sub_list: Vec::new(),
        }
    }
}

/// The Resource trait for the remote endpoints backing a page.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a store can be shared across
/// async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ResourceError>`. Stores never propagate
/// these errors to their callers; they hand them to the error reporter.
#[async_trait]
pub trait Resource<T: Entity>: Send + Sync {
    /// Get the resource name (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// Fetch one page of entities.
    ///
    /// # Errors
    ///
    /// - `NetworkError` if the endpoint cannot be reached
    /// - `ApiError` if the endpoint rejects the query
    /// - `InvalidPayload` if the response does not match [`ListResponse`]
    async fn list(&self, query: &ListQuery) -> Result<ListResponse<T>, ResourceError>;

    /// Fetch a single entity by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no entity has the id
    async fn detail(&self, request: &DetailRequest) -> Result<DetailResponse<T>, ResourceError>;

    /// Persist a form and its child commands in one request.
    ///
    /// Implementations must treat `Update` commands for unchanged rows as
    /// no-ops.
    async fn save(&self, request: &SaveRequest<T>) -> Result<SaveResponse, ResourceError>;
}

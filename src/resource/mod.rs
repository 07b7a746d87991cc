//! resource
//!
//! Remote endpoints backing a page.
//!
//! # Architecture
//!
//! A page store reads and writes its entities through the [`Resource`]
//! trait:
//!
//! - [`HttpResource`]: JSON REST endpoint over `reqwest`
//! - [`MockResource`]: in-memory, records calls, scriptable failures
//! - [`OfflineResource`]: refuses remote calls when no endpoint is configured
//!
//! The trait is the only seam between the engine and the network, so the
//! whole store can be exercised without a server.

pub mod http;
pub mod mock;
pub mod offline;
pub mod traits;

pub use http::HttpResource;
pub use mock::{FailOn, MockOperation, MockResource};
pub use offline::OfflineResource;
pub use traits::{
    ChildCommand, DetailRequest, DetailResponse, ListResponse, Resource, ResourceError,
    RowCommand, SaveRequest, SaveResponse,
};

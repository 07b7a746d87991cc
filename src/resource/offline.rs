//! resource::offline
//!
//! Placeholder resource for when no endpoint is configured.
//!
//! Local-only operations (form edits, child staging, layout) work as
//! usual; any remote call fails with `NotImplemented` and is reported
//! like any other failure.

use std::marker::PhantomData;

use async_trait::async_trait;

use super::traits::{
    DetailRequest, DetailResponse, ListResponse, Resource, ResourceError, SaveRequest,
    SaveResponse,
};
use crate::core::types::{Entity, ListQuery};

const REASON: &str = "no API base URL configured (set [api] base_url or pass --api)";

/// Resource that refuses every remote call.
#[derive(Debug, Default)]
pub struct OfflineResource<T: Entity> {
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> OfflineResource<T> {
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Entity> Resource<T> for OfflineResource<T> {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn list(&self, _query: &ListQuery) -> Result<ListResponse<T>, ResourceError> {
        Err(ResourceError::NotImplemented(REASON.into()))
    }

    async fn detail(&self, _request: &DetailRequest) -> Result<DetailResponse<T>, ResourceError> {
        Err(ResourceError::NotImplemented(REASON.into()))
    }

    async fn save(&self, _request: &SaveRequest<T>) -> Result<SaveResponse, ResourceError> {
        Err(ResourceError::NotImplemented(REASON.into()))
    }
}

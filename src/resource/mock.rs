//! resource::mock
//!
//! Mock resource implementation for deterministic testing.
//!
//! # Design
//!
//! The mock resource provides a deterministic implementation of the
//! `Resource` trait for use in tests. It stores entities in memory, pages
//! them like a real list endpoint, records every call, and allows
//! configuring failures, per-call delays, and scripted list responses for
//! ordering scenarios.
//!
//! # Example
//!
//! ```
//! use pagestore::core::record::Record;
//! use pagestore::core::types::ListQuery;
//! use pagestore::resource::mock::MockResource;
//! use pagestore::resource::Resource;
//!
//! # tokio_test::block_on(async {
//! let items: Vec<Record> = (1..=3)
//!     .map(|i| serde_json::from_value(serde_json::json!({ "id": i })).unwrap())
//!     .collect();
//! let resource = MockResource::with_items(items);
//!
//! let page = resource.list(&ListQuery::default()).await.unwrap();
//! assert_eq!(page.items.len(), 3);
//! assert_eq!(page.page_count, Some(1));
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{
    DetailRequest, DetailResponse, ListResponse, Resource, ResourceError, SaveRequest,
    SaveResponse,
};
use crate::core::types::{Entity, ListQuery};

/// Mock resource for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockResource<T: Entity> {
    inner: Arc<Mutex<MockResourceInner<T>>>,
}

#[derive(Debug)]
struct MockResourceInner<T: Entity> {
    /// Backing entities in list order.
    items: Vec<T>,
    /// Whether list responses carry pagination fields.
    page_fields: bool,
    /// Responses returned by upcoming list calls before paging `items`.
    scripted_lists: VecDeque<ListResponse<T>>,
    /// Delays applied to upcoming calls, consumed in call order.
    delays: VecDeque<Duration>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation<T>>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail list with the given error.
    List(ResourceError),
    /// Fail detail with the given error.
    Detail(ResourceError),
    /// Fail save with the given error.
    Save(ResourceError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation<T: Entity> {
    List { query: ListQuery },
    Detail { id: String },
    Save { request: SaveRequest<T> },
}

impl<T: Entity> MockResource<T> {
    /// Create an empty mock resource.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a mock resource backed by `items`.
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockResourceInner {
                items,
                page_fields: true,
                scripted_lists: VecDeque::new(),
                delays: VecDeque::new(),
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use pagestore::core::record::Record;
    /// use pagestore::resource::mock::{FailOn, MockResource};
    /// use pagestore::resource::ResourceError;
    ///
    /// let resource = MockResource::<Record>::new()
    ///     .fail_on(FailOn::List(ResourceError::NetworkError("down".into())));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.set_fail_on(fail_on);
        self
    }

    /// Set the failure configuration on a shared handle.
    pub fn set_fail_on(&self, fail_on: FailOn) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = Some(fail_on);
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Omit `pageNumber`, `pageSize` and `pageCount` from list responses.
    pub fn without_page_fields(self) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.page_fields = false;
        }
        self
    }

    /// Queue a response for the next list call.
    pub fn push_list_response(&self, response: ListResponse<T>) {
        let mut inner = self.inner.lock().unwrap();
        inner.scripted_lists.push_back(response);
    }

    /// Queue a delay for the next call of any kind.
    pub fn push_delay(&self, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.delays.push_back(delay);
    }

    /// Replace the backing entities.
    pub fn set_items(&self, items: Vec<T>) {
        let mut inner = self.inner.lock().unwrap();
        inner.items = items;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation<T>> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Get the save requests received so far.
    pub fn saved(&self) -> Vec<SaveRequest<T>> {
        let inner = self.inner.lock().unwrap();
        inner
            .operations
            .iter()
            .filter_map(|op| match op {
                MockOperation::Save { request } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    fn record(&self, op: MockOperation<T>) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Sleep for the next queued delay, if any.
    async fn delay(&self) {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.delays.pop_front()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_fail(&self, kind: OpKind) -> Option<ResourceError> {
        let inner = self.inner.lock().unwrap();
        match (&inner.fail_on, kind) {
            (Some(FailOn::List(e)), OpKind::List) => Some(e.clone()),
            (Some(FailOn::Detail(e)), OpKind::Detail) => Some(e.clone()),
            (Some(FailOn::Save(e)), OpKind::Save) => Some(e.clone()),
            _ => None,
        }
    }
}

impl<T: Entity> Default for MockResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum OpKind {
    List,
    Detail,
    Save,
}

/// Number of pages needed for `total` rows at `page_size` rows per page.
fn page_count(total: usize, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as usize) as u32
}

#[async_trait]
impl<T: Entity> Resource<T> for MockResource<T> {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list(&self, query: &ListQuery) -> Result<ListResponse<T>, ResourceError> {
        self.record(MockOperation::List {
            query: query.clone(),
        });
        self.delay().await;

        if let Some(err) = self.check_fail(OpKind::List) {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        if let Some(scripted) = inner.scripted_lists.pop_front() {
            return Ok(scripted);
        }

        let size = query.page_size as usize;
        let start = (query.page_number.max(1) as usize - 1).saturating_mul(size);
        let items: Vec<T> = inner.items.iter().skip(start).take(size).cloned().collect();

        if !inner.page_fields {
            return Ok(ListResponse::from_items(items));
        }

        Ok(ListResponse {
            items,
            page_number: Some(query.page_number),
            page_size: Some(query.page_size),
            page_count: Some(page_count(inner.items.len(), query.page_size)),
        })
    }

    async fn detail(&self, request: &DetailRequest) -> Result<DetailResponse<T>, ResourceError> {
        self.record(MockOperation::Detail {
            id: request.id.clone(),
        });
        self.delay().await;

        if let Some(err) = self.check_fail(OpKind::Detail) {
            return Err(err);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .items
            .iter()
            .find(|item| item.id().as_deref() == Some(request.id.as_str()))
            .cloned()
            .map(|result| DetailResponse { result })
            .ok_or_else(|| ResourceError::NotFound(format!("item {}", request.id)))
    }

    async fn save(&self, request: &SaveRequest<T>) -> Result<SaveResponse, ResourceError> {
        self.record(MockOperation::Save {
            request: request.clone(),
        });
        self.delay().await;

        if let Some(err) = self.check_fail(OpKind::Save) {
            return Err(err);
        }

        Ok(serde_json::json!({ "ok": true, "sub_list": request.sub_list.len() }))
    }
}

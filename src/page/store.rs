//! page::store
//!
//! The page store: one list, one form, one staged child collection.
//!
//! # Architecture
//!
//! A [`PageStore`] owns the visible state of a single page, which is
//! exactly its [`PageMetadata`] snapshot plus three spinners. Every
//! transition is a short synchronous merge under one mutex, followed by a
//! gated publish through the [`MetadataBridge`]. Network calls run outside
//! the lock:
//!
//! ```text
//! lock -> read inputs -> unlock -> await resource -> lock -> merge + publish -> unlock
//! ```
//!
//! # Ordering
//!
//! List and save calls take a ticket from their kind's
//! [`RequestSequencer`]. A list response that is no longer the newest is
//! dropped.
//!
//! The form has its own sequence, a generation that advances on every form
//! transition: select, create, cancel, form edits and child row edits. A
//! detail call or save remembers the generation it started under, and its
//! result (or the rollback of a failed detail) only lands if the form has
//! not moved since. Saves always complete, but only the newest one, on an
//! untouched form, closes it.
//!
//! # Failures
//!
//! Remote failures are handed to the [`ErrorReporter`] and never returned.
//! The previous state is kept, spinners are lowered, and the async
//! operations return an [`Outcome`] so a caller can tell what happened.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pagestore::core::record::Record;
//! use pagestore::core::types::{RoutePath, RowKey};
//! use pagestore::page::{FormMode, Outcome, PageStore};
//! use pagestore::resource::MockResource;
//! use serde_json::json;
//!
//! let items = vec![
//!     Record::try_from(json!({ "id": 1, "name": "kim", "subList": [{ "id": "a" }] })).unwrap(),
//! ];
//! let route = RoutePath::new("/examples/list-with-form-list").unwrap();
//! let store = PageStore::<Record>::builder(route, Arc::new(MockResource::with_items(items))).build();
//!
//! tokio_test::block_on(async {
//!     assert_eq!(store.run_query(None).await, Outcome::Applied);
//!     assert_eq!(store.rows().len(), 1);
//!
//!     let row = store.rows()[0].values.clone();
//!     store.select_row(RowKey::Id("1".into()), Some(row)).await;
//!     assert_eq!(store.mode(), FormMode::Editing);
//!     assert_eq!(store.child_rows().len(), 1);
//! });
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::debug;

use super::bridge::MetadataBridge;
use super::form::{snapshot_of, FormMode};
use super::list::{contains_key, find_row, rows_from_items};
use super::reconcile::build_save_request;
use super::sequence::{RequestSequencer, Spinner, Ticket};
use super::staged::StagedRows;
use crate::core::metadata::PageMetadata;
use crate::core::types::{Entity, ListQuery, PageSummary, Row, RowKey, RoutePath, SortParam};
use crate::registry::{MemoryRegistry, TabRegistry};
use crate::resource::{DetailRequest, Resource, ResourceError, SaveRequest, SaveResponse};
use crate::ui::report::{ErrorReporter, LogReporter};

/// A failed store operation, as handed to the error reporter.
#[derive(Debug, Clone, Error)]
pub enum PageError {
    #[error("failed to load list: {0}")]
    List(#[source] ResourceError),

    #[error("failed to load detail: {0}")]
    Detail(#[source] ResourceError),

    #[error("failed to save: {0}")]
    Save(#[source] ResourceError),
}

impl PageError {
    /// Short name of the failed operation.
    pub fn operation(&self) -> &'static str {
        match self {
            PageError::List(_) => "list",
            PageError::Detail(_) => "detail",
            PageError::Save(_) => "save",
        }
    }

    /// The underlying resource failure.
    pub fn resource_error(&self) -> &ResourceError {
        match self {
            PageError::List(e) | PageError::Detail(e) | PageError::Save(e) => e,
        }
    }
}

/// What an async store operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The result was merged into the store.
    Applied,
    /// The call was ignored (unknown key) or its response was superseded.
    Dropped,
    /// The call failed and was reported.
    Failed,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

struct StoreState<T: Entity> {
    meta: PageMetadata<T>,
    bridge: MetadataBridge<T>,
}

/// Builder for [`PageStore`].
pub struct PageStoreBuilder<T: Entity> {
    route: RoutePath,
    resource: Arc<dyn Resource<T>>,
    registry: Option<Arc<dyn TabRegistry>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    defaults: PageMetadata<T>,
}

impl<T: Entity> PageStoreBuilder<T> {
    /// Registry to restore from and publish to. Defaults to a private
    /// [`MemoryRegistry`].
    pub fn registry(mut self, registry: Arc<dyn TabRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Reporter for failed operations. Defaults to [`LogReporter`].
    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Page size of the default query, used when nothing is restored.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.defaults.list_query.page_size = page_size;
        self
    }

    /// Restore from the registry and build the store.
    pub fn build(self) -> PageStore<T> {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(MemoryRegistry::new()));
        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(LogReporter::new()));

        let (bridge, meta) = MetadataBridge::restore(self.route, registry, self.defaults.clone());

        PageStore {
            resource: self.resource,
            reporter,
            defaults: self.defaults,
            state: Mutex::new(StoreState { meta, bridge }),
            list_seq: RequestSequencer::new(),
            form_seq: RequestSequencer::new(),
            save_seq: RequestSequencer::new(),
            list_spinner: Spinner::new(),
            detail_spinner: Spinner::new(),
            save_spinner: Spinner::new(),
        }
    }
}

/// State container for a list + form + staged sub list page.
///
/// Share it between tasks with `Arc<PageStore<T>>`.
pub struct PageStore<T: Entity> {
    resource: Arc<dyn Resource<T>>,
    reporter: Arc<dyn ErrorReporter>,
    defaults: PageMetadata<T>,
    state: Mutex<StoreState<T>>,
    list_seq: RequestSequencer,
    /// Form generation.
    form_seq: RequestSequencer,
    save_seq: RequestSequencer,
    list_spinner: Spinner,
    detail_spinner: Spinner,
    save_spinner: Spinner,
}

impl<T: Entity> std::fmt::Debug for PageStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStore")
            .field("route", self.lock().bridge.route())
            .field("resource", &self.resource.name())
            .finish_non_exhaustive()
    }
}

impl<T: Entity> PageStore<T> {
    /// Start building a store for `route` backed by `resource`.
    pub fn builder(route: RoutePath, resource: Arc<dyn Resource<T>>) -> PageStoreBuilder<T> {
        PageStoreBuilder {
            route,
            resource,
            registry: None,
            reporter: None,
            defaults: PageMetadata::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a transition and publish the result.
    fn update<R>(&self, f: impl FnOnce(&mut PageMetadata<T>) -> R) -> R {
        let mut guard = self.lock();
        let state = &mut *guard;
        let out = f(&mut state.meta);
        state.bridge.publish(&state.meta);
        out
    }

    /// Apply a form transition, advancing the form generation.
    fn update_form<R>(&self, f: impl FnOnce(&mut PageMetadata<T>, Ticket) -> R) -> R {
        self.update(|meta| {
            let generation = self.form_seq.issue();
            f(meta, generation)
        })
    }

    /// Apply a transition only if the form is still at `generation`.
    ///
    /// Returns `None` when a later form transition has happened.
    fn update_if_current<R>(
        &self,
        generation: Ticket,
        f: impl FnOnce(&mut PageMetadata<T>) -> R,
    ) -> Option<R> {
        let mut guard = self.lock();
        if !self.form_seq.is_latest(generation) {
            return None;
        }
        let state = &mut *guard;
        let out = f(&mut state.meta);
        state.bridge.publish(&state.meta);
        Some(out)
    }

    // ---------------------------------------------------------------- reads

    pub fn route(&self) -> RoutePath {
        self.lock().bridge.route().clone()
    }

    /// A copy of the current metadata snapshot.
    pub fn snapshot(&self) -> PageMetadata<T> {
        self.lock().meta.clone()
    }

    pub fn query(&self) -> ListQuery {
        self.lock().meta.list_query.clone()
    }

    pub fn rows(&self) -> Vec<Row<T>> {
        self.lock().meta.list_rows.clone()
    }

    pub fn page(&self) -> PageSummary {
        self.lock().meta.list_page
    }

    pub fn selected_key(&self) -> Option<RowKey> {
        self.lock().meta.list_selected_row_key.clone()
    }

    pub fn form(&self) -> Option<T> {
        self.lock().meta.form.clone()
    }

    pub fn detail(&self) -> Option<T> {
        self.lock().meta.detail.clone()
    }

    pub fn child_rows(&self) -> Vec<Row<T::Child>> {
        self.lock().meta.sub_list_rows.clone()
    }

    pub fn checked_indexes(&self) -> Vec<usize> {
        self.lock().meta.sub_list_checked_indexes.clone()
    }

    pub fn child_selected_key(&self) -> Option<RowKey> {
        self.lock().meta.sub_list_selected_row_key.clone()
    }

    pub fn mode(&self) -> FormMode {
        let state = self.lock();
        let meta = &state.meta;
        FormMode::derive(
            meta.form_active,
            meta.list_selected_row_key.as_ref(),
            meta.detail.is_some(),
        )
    }

    pub fn is_list_spinning(&self) -> bool {
        self.list_spinner.is_spinning()
    }

    pub fn is_detail_spinning(&self) -> bool {
        self.detail_spinner.is_spinning()
    }

    pub fn is_saving(&self) -> bool {
        self.save_spinner.is_spinning()
    }

    // ---------------------------------------------------------------- list

    /// Replace the stored query without running it.
    pub fn set_query(&self, query: ListQuery) {
        self.update(|meta| meta.list_query = query);
    }

    /// Fetch a page of rows.
    ///
    /// Runs `query` if given, otherwise the stored query. A given query is
    /// not stored. On failure the previous rows stay in place.
    pub async fn run_query(&self, query: Option<ListQuery>) -> Outcome {
        let query = query.unwrap_or_else(|| self.query());
        let ticket = self.list_seq.issue();
        let _spinning = self.list_spinner.raise();

        match self.resource.list(&query).await {
            Ok(response) => {
                if !self.list_seq.is_latest(ticket) {
                    debug!(ticket = ticket.value(), "dropping stale list response");
                    return Outcome::Dropped;
                }
                let page = PageSummary::from_response(&response);
                let rows = rows_from_items(response.items);
                self.update(|meta| {
                    meta.list_rows = rows;
                    meta.list_page = page;
                    let stale = meta
                        .list_selected_row_key
                        .as_ref()
                        .is_some_and(|key| !contains_key(&meta.list_rows, key));
                    if stale {
                        debug!("clearing selection missing from new rows");
                        meta.list_selected_row_key = None;
                    }
                });
                debug!(
                    rows = page.total_elements,
                    page = page.current_page,
                    "list loaded"
                );
                Outcome::Applied
            }
            Err(e) => {
                self.reporter.report(&PageError::List(e)).await;
                Outcome::Failed
            }
        }
    }

    /// Move to another page and run the query.
    ///
    /// A missing page size keeps the stored one.
    pub async fn change_page(&self, page_number: u32, page_size: Option<u32>) -> Outcome {
        self.update(|meta| meta.list_query = meta.list_query.paged(page_number, page_size));
        self.run_query(None).await
    }

    // ---------------------------------------------------------------- form

    /// Select a list row and open the form on it.
    ///
    /// With `source`, the form is filled from it immediately. Without one,
    /// rows that have an id are fetched from the detail endpoint, and rows
    /// without an id use their list values. A key that is not in the
    /// current rows is ignored.
    pub async fn select_row(&self, key: RowKey, source: Option<T>) -> Outcome {
        let inline = {
            let state = self.lock();
            match find_row(&state.meta.list_rows, &key) {
                Some((_, row)) => row.values.clone(),
                None => {
                    debug!(key = %key, "ignoring selection of unknown row");
                    return Outcome::Dropped;
                }
            }
        };

        if let Some(entity) = source {
            self.open_on(key, &entity);
            return Outcome::Applied;
        }
        let Some(id) = key.id().map(str::to_string) else {
            self.open_on(key, &inline);
            return Outcome::Applied;
        };

        let _spinning = self.detail_spinner.raise();

        // Selection shows immediately; the form fills in when detail arrives.
        let (generation, previous) = self.update_form(|meta, generation| {
            let previous = SelectionState::capture(meta);
            meta.list_selected_row_key = Some(key.clone());
            meta.form_active = true;
            meta.sub_list_checked_indexes.clear();
            meta.sub_list_selected_row_key = None;
            (generation, previous)
        });

        match self.resource.detail(&DetailRequest { id }).await {
            Ok(response) => {
                let children = StagedRows::hydrate(response.result.children());
                let applied = self.update_if_current(generation, |meta| {
                    Self::fill_form(meta, key, &response.result, children)
                });
                if applied.is_none() {
                    debug!(
                        generation = generation.value(),
                        "form moved on, dropping detail response"
                    );
                    return Outcome::Dropped;
                }
                Outcome::Applied
            }
            Err(e) => {
                let restored = self.update_if_current(generation, |meta| previous.restore(meta));
                if restored.is_none() {
                    debug!(
                        generation = generation.value(),
                        "form moved on, keeping it after detail failure"
                    );
                }
                self.reporter.report(&PageError::Detail(e)).await;
                Outcome::Failed
            }
        }
    }

    fn open_on(&self, key: RowKey, entity: &T) {
        let children = StagedRows::hydrate(entity.children());
        self.update_form(|meta, _| Self::fill_form(meta, key, entity, children));
    }

    fn fill_form(
        meta: &mut PageMetadata<T>,
        key: RowKey,
        entity: &T,
        children: StagedRows<T::Child>,
    ) {
        // The rows may have been replaced while a detail was in flight.
        if !contains_key(&meta.list_rows, &key) {
            debug!(key = %key, "selected row disappeared");
            return;
        }
        meta.list_selected_row_key = Some(key);
        meta.form = Some(snapshot_of(entity));
        meta.detail = Some(entity.clone());
        meta.form_active = true;
        meta.sub_list_rows = children.into_rows();
        meta.sub_list_checked_indexes.clear();
        meta.sub_list_selected_row_key = None;
    }

    /// Open an empty form for a new entity. The list selection is cleared.
    pub fn activate_create(&self) {
        self.update_form(|meta, _| {
            meta.form_active = true;
            meta.list_selected_row_key = None;
            meta.detail = None;
            meta.form = None;
            meta.sub_list_rows.clear();
            meta.sub_list_checked_indexes.clear();
            meta.sub_list_selected_row_key = None;
        });
    }

    /// Close the form and clear the selection.
    ///
    /// List data and the form snapshot are kept.
    pub fn cancel(&self) {
        self.update_form(|meta, _| Self::close_form(meta));
    }

    fn close_form(meta: &mut PageMetadata<T>) {
        meta.form_active = false;
        meta.list_selected_row_key = None;
        meta.sub_list_checked_indexes.clear();
        meta.sub_list_selected_row_key = None;
    }

    /// Replace the form snapshot.
    pub fn set_form(&self, form: T) {
        self.update_form(|meta, _| meta.form = Some(form));
    }

    // ---------------------------------------------------------------- sub list

    /// Append new child rows.
    pub fn add_children(&self, entities: Vec<T::Child>) {
        self.update_form(|meta, _| {
            let rows = StagedRows::from_rows(std::mem::take(&mut meta.sub_list_rows));
            meta.sub_list_rows = rows.add(entities).into_rows();
        });
    }

    /// Remove child rows by index, then clear the checked indexes.
    pub fn remove_children(&self, indexes: &[usize]) {
        self.update_form(|meta, _| {
            let rows = StagedRows::from_rows(std::mem::take(&mut meta.sub_list_rows));
            meta.sub_list_rows = rows.remove(indexes).into_rows();
            meta.sub_list_checked_indexes.clear();
            let stale = meta
                .sub_list_selected_row_key
                .as_ref()
                .is_some_and(|key| !contains_key(&meta.sub_list_rows, key));
            if stale {
                meta.sub_list_selected_row_key = None;
            }
        });
    }

    /// Replace the values of one child row.
    pub fn edit_child(&self, index: usize, values: T::Child) {
        self.update_form(|meta, _| {
            let rows = StagedRows::from_rows(std::mem::take(&mut meta.sub_list_rows));
            meta.sub_list_rows = rows.edit(index, values).into_rows();
        });
    }

    /// Set the checked child rows. Out-of-range indexes are dropped.
    pub fn set_checked_indexes(&self, indexes: Vec<usize>) {
        self.update(|meta| {
            let len = meta.sub_list_rows.len();
            let (valid, stale): (Vec<usize>, Vec<usize>) =
                indexes.into_iter().partition(|&i| i < len);
            if !stale.is_empty() {
                debug!(?stale, len, "dropping out-of-range checked indexes");
            }
            meta.sub_list_checked_indexes = valid;
        });
    }

    /// Select a child row, or clear the child selection with `None`.
    ///
    /// A key that is not in the child rows is ignored.
    pub fn set_child_selected_key(&self, key: Option<RowKey>) {
        self.update(|meta| match key {
            Some(key) if !contains_key(&meta.sub_list_rows, &key) => {
                debug!(key = %key, "ignoring selection of unknown child row");
            }
            key => meta.sub_list_selected_row_key = key,
        });
    }

    // ---------------------------------------------------------------- save

    /// Send the form and its staged children to the save endpoint.
    ///
    /// With `request`, that payload is sent as is. On success the form
    /// closes (the same transition as [`cancel`](Self::cancel)), the child
    /// rows settle to what the server now holds, and the list is not
    /// refreshed. A form changed while the save was in flight is left
    /// open. On failure the form stays open with its edits.
    pub async fn save(&self, request: Option<SaveRequest<T>>) -> Outcome {
        let (request, generation) = {
            let state = self.lock();
            let request = request.unwrap_or_else(|| Self::request_from(&state.meta));
            (request, self.form_seq.current())
        };
        let ticket = self.save_seq.issue();
        let _saving = self.save_spinner.raise();

        match self.resource.save(&request).await {
            Ok(response) => {
                self.after_save(ticket, generation, &response);
                Outcome::Applied
            }
            Err(e) => {
                self.reporter.report(&PageError::Save(e)).await;
                Outcome::Failed
            }
        }
    }

    fn after_save(&self, ticket: Ticket, generation: Ticket, response: &SaveResponse) {
        if !self.save_seq.is_latest(ticket) {
            debug!(ticket = ticket.value(), "older save finished, form left as is");
            return;
        }
        let closed = self.update_if_current(generation, |meta| {
            let rows = StagedRows::from_rows(std::mem::take(&mut meta.sub_list_rows));
            meta.sub_list_rows = rows.settle().into_rows();
            Self::close_form(meta);
            self.form_seq.issue();
        });
        match closed {
            Some(()) => debug!(?response, "saved"),
            None => debug!(?response, "saved, form changed meanwhile and stays open"),
        }
    }

    /// The payload [`save`](Self::save) would send without an explicit request.
    pub fn save_request(&self) -> SaveRequest<T> {
        Self::request_from(&self.lock().meta)
    }

    fn request_from(meta: &PageMetadata<T>) -> SaveRequest<T> {
        let children = StagedRows::from_rows(meta.sub_list_rows.clone());
        build_save_request(meta.form.as_ref(), &children)
    }

    // ---------------------------------------------------------------- layout

    pub fn set_col_widths(&self, widths: Vec<u32>) {
        self.update(|meta| meta.list_col_widths = widths);
    }

    /// Set the grid sort and mirror it into the stored query.
    pub fn set_sort_params(&self, params: Vec<SortParam>) {
        self.update(|meta| {
            meta.list_query.sort = params.clone();
            meta.list_sort_params = params;
        });
    }

    /// Set the list pane's layout ratio. Negative or non-finite values are ignored.
    pub fn set_flex_grow(&self, flex_grow: f64) {
        if !flex_grow.is_finite() || flex_grow < 0.0 {
            debug!(flex_grow, "ignoring invalid flex grow");
            return;
        }
        self.update(|meta| meta.flex_grow = flex_grow);
    }

    pub fn set_child_col_widths(&self, widths: Vec<u32>) {
        self.update(|meta| meta.sub_list_col_widths = widths);
    }

    // ---------------------------------------------------------------- metadata

    /// Re-seed every metadata field from `metadata`, or from the store's
    /// defaults when `None`.
    ///
    /// Selections that do not refer to an existing row are cleared.
    pub fn sync_metadata(&self, metadata: Option<PageMetadata<T>>) {
        let mut next = metadata.unwrap_or_else(|| self.defaults.clone());
        if let Some(key) = &next.list_selected_row_key {
            if !contains_key(&next.list_rows, key) {
                debug!(key = %key, "clearing unknown selection from synced metadata");
                next.list_selected_row_key = None;
            }
        }
        if let Some(key) = &next.sub_list_selected_row_key {
            if !contains_key(&next.sub_list_rows, key) {
                next.sub_list_selected_row_key = None;
            }
        }
        let len = next.sub_list_rows.len();
        next.sub_list_checked_indexes.retain(|&i| i < len);
        if !next.flex_grow.is_finite() || next.flex_grow < 0.0 {
            next.flex_grow = self.defaults.flex_grow;
        }

        self.update_form(|meta, _| *meta = next);
    }
}

/// Selection and form fields saved before an optimistic select.
struct SelectionState<T: Entity> {
    selected: Option<RowKey>,
    form: Option<T>,
    detail: Option<T>,
    form_active: bool,
    sub_list_rows: Vec<Row<T::Child>>,
    checked: Vec<usize>,
    child_selected: Option<RowKey>,
}

impl<T: Entity> SelectionState<T> {
    fn capture(meta: &PageMetadata<T>) -> Self {
        Self {
            selected: meta.list_selected_row_key.clone(),
            form: meta.form.clone(),
            detail: meta.detail.clone(),
            form_active: meta.form_active,
            sub_list_rows: meta.sub_list_rows.clone(),
            checked: meta.sub_list_checked_indexes.clone(),
            child_selected: meta.sub_list_selected_row_key.clone(),
        }
    }

    fn restore(self, meta: &mut PageMetadata<T>) {
        meta.list_selected_row_key = self
            .selected
            .filter(|key| contains_key(&meta.list_rows, key));
        meta.form = self.form;
        meta.detail = self.detail;
        meta.form_active = self.form_active;
        meta.sub_list_rows = self.sub_list_rows;
        meta.sub_list_checked_indexes = self.checked;
        meta.sub_list_selected_row_key = self.child_selected;
    }
}

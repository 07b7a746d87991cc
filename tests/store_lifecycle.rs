//! Integration tests for the page store lifecycle.
//!
//! These drive a store end to end against the mock resource and an
//! in-memory registry: query, select, stage child edits, save, and
//! reopen the page from its published snapshot.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use pagestore::core::metadata::PageMetadata;
use pagestore::core::record::Record;
use pagestore::core::types::{ListQuery, PageSummary, RoutePath, RowKey, RowStatus};
use pagestore::page::{FormMode, Outcome, PageStore};
use pagestore::registry::{MemoryRegistry, TabRegistry};
use pagestore::resource::{
    FailOn, ListResponse, MockOperation, MockResource, ResourceError, RowCommand,
};
use pagestore::ui::report::CollectingReporter;

// =============================================================================
// Test Fixtures
// =============================================================================

const ROUTE: &str = "/examples/list-with-form-list";

fn record(value: serde_json::Value) -> Record {
    Record::try_from(value).unwrap()
}

fn route() -> RoutePath {
    RoutePath::new(ROUTE).unwrap()
}

fn orders() -> Vec<Record> {
    vec![
        record(json!({
            "id": 1,
            "customer": "kim",
            "subList": [
                { "id": "l1", "sku": "A-100", "qty": 2 },
                { "id": "l2", "sku": "B-200", "qty": 1 }
            ]
        })),
        record(json!({ "id": 2, "customer": "lee", "subList": [] })),
        record(json!({ "id": 3, "customer": "park" })),
    ]
}

/// A store plus handles on everything it talks to.
struct Page {
    store: PageStore<Record>,
    resource: MockResource<Record>,
    registry: MemoryRegistry,
    reporter: CollectingReporter,
}

impl Page {
    fn new(resource: MockResource<Record>) -> Self {
        Self::with_registry(resource, MemoryRegistry::new())
    }

    fn with_registry(resource: MockResource<Record>, registry: MemoryRegistry) -> Self {
        let reporter = CollectingReporter::new();
        let store = PageStore::<Record>::builder(route(), Arc::new(resource.clone()))
            .registry(Arc::new(registry.clone()))
            .reporter(Arc::new(reporter.clone()))
            .build();
        Self {
            store,
            resource,
            registry,
            reporter,
        }
    }

    /// Open another store on the same route and registry.
    fn reopen(&self) -> PageStore<Record> {
        PageStore::<Record>::builder(route(), Arc::new(self.resource.clone()))
            .registry(Arc::new(self.registry.clone()))
            .reporter(Arc::new(self.reporter.clone()))
            .build()
    }
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn first_page_summary_and_spinner() {
    let resource = MockResource::new();
    resource.push_list_response(ListResponse {
        items: orders(),
        page_number: Some(1),
        page_size: Some(100),
        page_count: Some(1),
    });
    let page = Page::new(resource);

    assert_eq!(page.store.run_query(None).await, Outcome::Applied);
    assert_eq!(
        page.store.page(),
        PageSummary {
            current_page: 1,
            page_size: 100,
            total_pages: 1,
            total_elements: 3,
        }
    );
    assert!(!page.store.is_list_spinning());

    page.resource
        .set_fail_on(FailOn::List(ResourceError::NetworkError("timeout".into())));
    assert_eq!(page.store.run_query(None).await, Outcome::Failed);
    assert!(!page.store.is_list_spinning());
    assert_eq!(page.store.rows().len(), 3);
}

#[tokio::test]
async fn missing_page_fields_fall_back() {
    let page = Page::new(MockResource::with_items(orders()).without_page_fields());
    page.store.run_query(None).await;

    assert_eq!(
        page.store.page(),
        PageSummary {
            current_page: 1,
            page_size: 0,
            total_pages: 0,
            total_elements: 3,
        }
    );
}

#[tokio::test]
async fn stale_list_response_is_dropped() {
    let page = Page::new(MockResource::with_items(orders()));
    page.resource.push_delay(Duration::from_millis(80));
    page.resource.push_delay(Duration::ZERO);

    let slow = page.store.run_query(Some(ListQuery::with_page_size(1)));
    let fast = page.store.run_query(Some(ListQuery::with_page_size(2)));
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(fast, Outcome::Applied);
    assert_eq!(slow, Outcome::Dropped);
    assert_eq!(page.store.rows().len(), 2);
    assert!(!page.store.is_list_spinning());
}

// =============================================================================
// Form and sub list
// =============================================================================

#[tokio::test]
async fn edit_children_and_save() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.run_query(None).await;

    page.store.select_row(RowKey::Id("1".into()), None).await;
    assert_eq!(page.store.mode(), FormMode::Editing);
    assert_eq!(page.store.child_rows().len(), 2);

    let mut form = page.store.form().unwrap();
    form.set("customer", json!("kim2"));
    page.store.set_form(form);

    page.store
        .add_children(vec![record(json!({ "sku": "C-300", "qty": 5 }))]);
    page.store
        .edit_child(1, record(json!({ "id": "l2", "sku": "B-200", "qty": 4 })));
    page.store.remove_children(&[0, 2]);

    let statuses: Vec<_> = page.store.child_rows().iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![RowStatus::Removed, RowStatus::Edited]);

    assert_eq!(page.store.save(None).await, Outcome::Applied);
    assert_eq!(page.store.mode(), FormMode::Browsing);

    let saved = page.resource.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].form.get("customer"), Some(&json!("kim2")));
    assert!(saved[0].form.get("subList").is_none());
    let commands: Vec<_> = saved[0].sub_list.iter().map(|c| c.status).collect();
    assert_eq!(commands, vec![RowCommand::Delete, RowCommand::Update]);

    // Save does not refresh the list.
    let lists = page
        .resource
        .operations()
        .iter()
        .filter(|op| matches!(op, MockOperation::List { .. }))
        .count();
    assert_eq!(lists, 1);
}

#[tokio::test]
async fn create_flow_sends_new_children_only() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.activate_create();
    assert_eq!(page.store.mode(), FormMode::Creating);

    page.store.set_form(record(json!({ "customer": "choi" })));
    page.store.add_children(vec![
        record(json!({ "sku": "A" })),
        record(json!({ "sku": "B" })),
    ]);
    page.store.remove_children(&[0]);

    page.store.save(None).await;
    let saved = &page.resource.saved()[0];
    assert_eq!(saved.sub_list.len(), 1);
    assert_eq!(saved.sub_list[0].status, RowCommand::Create);
    assert_eq!(saved.sub_list[0].values.get("sku"), Some(&json!("B")));
}

#[tokio::test]
async fn save_failure_is_reported_and_form_kept() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.run_query(None).await;
    page.store.select_row(RowKey::Id("2".into()), None).await;
    page.resource.set_fail_on(FailOn::Save(ResourceError::ApiError {
        status: 500,
        message: "boom".into(),
    }));

    assert_eq!(page.store.save(None).await, Outcome::Failed);
    assert_eq!(page.store.mode(), FormMode::Editing);
    assert_eq!(page.store.selected_key(), Some(RowKey::Id("2".into())));
    assert!(!page.store.is_saving());

    let errors = page.reporter.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].operation(), "save");
}

#[tokio::test]
async fn second_save_sends_no_create_or_delete() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.run_query(None).await;
    page.store.select_row(RowKey::Id("1".into()), None).await;
    page.store.add_children(vec![record(json!({ "sku": "C-300" }))]);
    page.store.remove_children(&[0]);

    assert_eq!(page.store.save(None).await, Outcome::Applied);
    let rows = page.store.child_rows();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.status == RowStatus::Unmodified));

    page.store.save(None).await;
    let saved = page.resource.saved();
    assert_eq!(saved.len(), 2);
    assert!(saved[1]
        .sub_list
        .iter()
        .all(|c| c.status == RowCommand::Update));
}

// =============================================================================
// Form ordering
// =============================================================================

#[tokio::test]
async fn detail_after_cancel_is_dropped() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.run_query(None).await;
    page.resource.push_delay(Duration::from_millis(100));

    let select = page.store.select_row(RowKey::Id("1".into()), None);
    let cancel = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        page.store.cancel();
    };
    let (outcome, ()) = tokio::join!(select, cancel);

    assert_eq!(outcome, Outcome::Dropped);
    assert_eq!(page.store.mode(), FormMode::Browsing);
    assert_eq!(page.store.selected_key(), None);
    assert!(!page.store.is_detail_spinning());
}

#[tokio::test]
async fn detail_does_not_override_a_later_inline_select() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.run_query(None).await;
    let second = page.store.rows()[1].values.clone();
    page.resource.push_delay(Duration::from_millis(100));

    let slow = page.store.select_row(RowKey::Id("1".into()), None);
    let inline = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        page.store.select_row(RowKey::Id("2".into()), Some(second)).await
    };
    let (slow, inline) = tokio::join!(slow, inline);

    assert_eq!(inline, Outcome::Applied);
    assert_eq!(slow, Outcome::Dropped);
    assert_eq!(page.store.selected_key(), Some(RowKey::Id("2".into())));
    assert_eq!(page.store.form().unwrap().get("customer"), Some(&json!("lee")));
}

#[tokio::test]
async fn detail_failure_keeps_later_child_edits() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.run_query(None).await;
    page.resource
        .set_fail_on(FailOn::Detail(ResourceError::NetworkError("reset".into())));
    page.resource.push_delay(Duration::from_millis(100));

    let select = page.store.select_row(RowKey::Id("1".into()), None);
    let create = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        page.store.activate_create();
        page.store.add_children(vec![record(json!({ "sku": "N-1" }))]);
    };
    let (outcome, ()) = tokio::join!(select, create);

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(page.store.mode(), FormMode::Creating);
    assert_eq!(page.store.selected_key(), None);
    assert_eq!(page.store.child_rows().len(), 1);
    assert_eq!(page.reporter.errors().len(), 1);
}

#[tokio::test]
async fn save_does_not_close_a_form_opened_meanwhile() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.run_query(None).await;
    page.store.select_row(RowKey::Id("1".into()), None).await;
    let second = page.store.rows()[1].values.clone();
    page.resource.push_delay(Duration::from_millis(100));

    let save = page.store.save(None);
    let select = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        page.store.select_row(RowKey::Id("2".into()), Some(second)).await
    };
    let (saved, _) = tokio::join!(save, select);

    assert_eq!(saved, Outcome::Applied);
    assert_eq!(page.resource.saved()[0].form.get("customer"), Some(&json!("kim")));
    assert_eq!(page.store.mode(), FormMode::Editing);
    assert_eq!(page.store.selected_key(), Some(RowKey::Id("2".into())));
    assert!(!page.store.is_saving());
}

// =============================================================================
// Snapshot and restore
// =============================================================================

#[tokio::test]
async fn reopened_store_restores_every_field() {
    let page = Page::new(MockResource::with_items(orders()));
    page.store.set_col_widths(vec![120, 80, 200]);
    page.store.set_sort_params(vec!["customer:desc".parse().unwrap()]);
    page.store.set_flex_grow(0.6);
    page.store.run_query(None).await;
    page.store.select_row(RowKey::Id("1".into()), None).await;
    page.store.add_children(vec![record(json!({ "sku": "Z" }))]);
    page.store.set_checked_indexes(vec![0, 2]);
    page.store.set_child_selected_key(Some(RowKey::Id("l2".into())));
    page.store.set_child_col_widths(vec![60]);

    let reopened = page.reopen();
    assert_eq!(reopened.snapshot(), page.store.snapshot());
    assert_eq!(reopened.mode(), FormMode::Editing);
}

#[test]
fn nothing_published_means_defaults() {
    let page = Page::new(MockResource::new());
    assert_eq!(page.store.snapshot(), PageMetadata::default());
    assert_eq!(page.registry.write_count(), 0);
    assert!(page.registry.get(&route()).unwrap().is_none());
}

#[test]
fn unreadable_document_falls_back_to_defaults() {
    let registry = MemoryRegistry::new();
    registry
        .set(&route(), json!({ "kind": "something-else" }))
        .unwrap();

    let page = Page::with_registry(MockResource::new(), registry);
    assert_eq!(page.store.snapshot(), PageMetadata::default());
}

#[test]
fn routes_do_not_share_state() {
    let registry = MemoryRegistry::new();
    let resource = MockResource::<Record>::new();
    let a = PageStore::<Record>::builder(RoutePath::new("/a").unwrap(), Arc::new(resource.clone()))
        .registry(Arc::new(registry.clone()))
        .build();
    a.set_col_widths(vec![10]);

    let b = PageStore::<Record>::builder(RoutePath::new("/b").unwrap(), Arc::new(resource))
        .registry(Arc::new(registry.clone()))
        .build();
    assert!(b.snapshot().list_col_widths.is_empty());
    assert_eq!(registry.routes().unwrap(), vec![RoutePath::new("/a").unwrap()]);
}

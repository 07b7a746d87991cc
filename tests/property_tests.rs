//! Property-based tests for the page engine.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use pagestore::core::record::Record;
use pagestore::core::types::{Entity, RoutePath, RowKey, RowStatus, SortParam};
use pagestore::page::reconcile::child_commands;
use pagestore::page::{PageStore, StagedRows};
use pagestore::registry::{MemoryRegistry, TabRegistry};
use pagestore::resource::{MockResource, RowCommand};
use pagestore::ui::report::CollectingReporter;

/// One staging action on a child collection.
#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(Vec<usize>),
    Edit(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1usize..3).prop_map(Op::Add),
        prop::collection::vec(0usize..10, 1..4).prop_map(Op::Remove),
        (0usize..10).prop_map(Op::Edit),
    ]
}

fn server_rows(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::try_from(json!({ "id": format!("s{}", i) })).unwrap())
        .collect()
}

fn is_server_row(record: &Record) -> bool {
    record.get("id").is_some()
}

/// Apply `ops`, returning the staged rows and the ids of removed server rows.
fn apply(initial: usize, ops: &[Op]) -> (StagedRows<Record>, HashSet<String>) {
    let mut rows = StagedRows::hydrate(server_rows(initial));
    let mut removed = HashSet::new();
    let mut added = 0;

    for op in ops {
        rows = match op {
            Op::Add(count) => {
                let new = (0..*count)
                    .map(|_| {
                        added += 1;
                        Record::try_from(json!({ "added": added })).unwrap()
                    })
                    .collect();
                rows.add(new)
            }
            Op::Remove(indexes) => {
                for &i in indexes {
                    if let Some(row) = rows.as_slice().get(i) {
                        if let Some(id) = row.values.get("id").and_then(|v| v.as_str()) {
                            removed.insert(id.to_string());
                        }
                    }
                }
                rows.remove(indexes)
            }
            Op::Edit(index) => match rows.as_slice().get(*index) {
                Some(row) => {
                    let mut values = row.values.clone();
                    values.set("touched", json!(true));
                    rows.edit(*index, values)
                }
                None => rows,
            },
        };
    }
    (rows, removed)
}

fn selection_keys() -> impl Strategy<Value = RowKey> {
    prop_oneof![
        (0u32..8).prop_map(|id| RowKey::Id(id.to_string())),
        (0usize..8).prop_map(RowKey::Position),
    ]
}

fn store_with(items: Vec<Record>, registry: &MemoryRegistry) -> PageStore<Record> {
    PageStore::<Record>::builder(
        RoutePath::new("/props").unwrap(),
        Arc::new(MockResource::with_items(items)),
    )
    .registry(Arc::new(registry.clone()))
    .reporter(Arc::new(CollectingReporter::new()))
    .build()
}

fn list_items(ids: &[u32]) -> Vec<Record> {
    ids.iter()
        .map(|id| Record::try_from(json!({ "id": id, "name": format!("n{}", id) })).unwrap())
        .collect()
}

proptest! {
    /// Rows added in-session are dropped on removal, never marked removed.
    #[test]
    fn new_rows_never_become_removed(initial in 0usize..4, ops in prop::collection::vec(op(), 0..12)) {
        let (rows, _) = apply(initial, &ops);
        for row in rows.iter() {
            if !is_server_row(&row.values) {
                prop_assert_eq!(row.status, RowStatus::New);
            }
        }
        let server = rows.iter().filter(|r| is_server_row(&r.values)).count();
        prop_assert_eq!(server, initial);
    }

    /// Server rows reconcile to D when removed and U otherwise; added rows to C.
    #[test]
    fn command_codes_follow_row_origin(initial in 0usize..4, ops in prop::collection::vec(op(), 0..12)) {
        let (rows, removed) = apply(initial, &ops);
        for command in child_commands(rows.as_slice()) {
            match command.values.get("id").and_then(|v| v.as_str()) {
                Some(id) if removed.contains(id) => prop_assert_eq!(command.status, RowCommand::Delete),
                Some(_) => prop_assert_eq!(command.status, RowCommand::Update),
                None => prop_assert_eq!(command.status, RowCommand::Create),
            }
        }
    }

    /// Selecting a key that is not in the rows leaves nothing selected.
    #[test]
    fn unknown_selection_never_sticks(
        ids in prop::collection::btree_set(0u32..5, 0..5),
        key in selection_keys(),
    ) {
        let ids: Vec<u32> = ids.into_iter().collect();
        let store = store_with(list_items(&ids), &MemoryRegistry::new());
        tokio_test::block_on(async {
            store.run_query(None).await;
            store.select_row(key.clone(), None).await;
        });

        // Every item has an id, so only id keys can match.
        let present = matches!(&key, RowKey::Id(id) if ids.iter().any(|i| i.to_string() == *id));
        if !present {
            prop_assert_eq!(store.selected_key(), None);
        }
        if let Some(selected) = store.selected_key() {
            prop_assert!(store.rows().iter().any(|r| r.values.id().as_deref() == selected.id()));
        }
    }

    /// A store reopened on the same route sees every published field.
    #[test]
    fn reopen_restores_snapshot(
        widths in prop::collection::vec(20u32..400, 0..6),
        child_widths in prop::collection::vec(20u32..400, 0..4),
        grow in 0.0f64..4.0,
        sort_field in "[a-z]{1,8}",
        descending in any::<bool>(),
        select in any::<bool>(),
    ) {
        let registry = MemoryRegistry::new();
        let store = store_with(list_items(&[1, 2, 3]), &registry);

        store.set_col_widths(widths);
        store.set_child_col_widths(child_widths);
        store.set_flex_grow(grow);
        let dir = if descending { "desc" } else { "asc" };
        let sort: SortParam = format!("{}:{}", sort_field, dir).parse().unwrap();
        store.set_sort_params(vec![sort]);
        tokio_test::block_on(async {
            store.run_query(None).await;
            if select {
                store.select_row(RowKey::Id("2".into()), None).await;
            }
        });

        let reopened = store_with(Vec::new(), &registry);
        prop_assert_eq!(reopened.snapshot(), store.snapshot());
    }

    /// Cancelling twice is the same as cancelling once.
    #[test]
    fn cancel_is_idempotent(select in any::<bool>(), create in any::<bool>()) {
        let registry = MemoryRegistry::new();
        let store = store_with(list_items(&[1, 2]), &registry);
        tokio_test::block_on(async {
            store.run_query(None).await;
            if select {
                store.select_row(RowKey::Id("1".into()), None).await;
            }
        });
        if create {
            store.activate_create();
        }

        store.cancel();
        let once = store.snapshot();
        let document = registry.get(&RoutePath::new("/props").unwrap()).unwrap();
        let writes = registry.write_count();

        store.cancel();
        prop_assert_eq!(store.snapshot(), once);
        prop_assert_eq!(registry.write_count(), writes);
        prop_assert_eq!(registry.get(&RoutePath::new("/props").unwrap()).unwrap(), document);
    }
}

//! Property-based tests for MemoryStore live queries.
//!
//! Every snapshot delivered to a watcher must be the complete, ordered result
//! set: ascending by the order field, ties in insertion order, nothing missing
//! and nothing duplicated.

use std::sync::{Arc, Mutex};

use futures::executor::block_on;
use murmur_backend::{MemoryStore, SystemEnv};
use murmur_core::{
    CollectionPath, DocumentStore, FieldValue, Fields, Query, Snapshot, Timestamp, Value,
    WatchEvent,
};
use proptest::prelude::*;

fn path() -> CollectionPath {
    CollectionPath::messages("props")
}

/// Write with an explicit timestamp so ties are easy to provoke.
fn fields(label: usize, seconds: i64) -> Fields {
    let mut fields = Fields::new();
    fields.insert("text".into(), FieldValue::from(label.to_string()));
    fields.insert("timestamp".into(), FieldValue::from(Timestamp::new(seconds, 0)));
    fields
}

fn watch(store: &MemoryStore<SystemEnv>) -> (murmur_core::Subscription, Arc<Mutex<Vec<Snapshot>>>) {
    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    let sub = store.watch(
        &Query::ordered_by(path(), "timestamp"),
        Box::new(move |event| {
            if let (WatchEvent::Snapshot(s), Ok(mut all)) = (event, sink.lock()) {
                all.push(s);
            }
        }),
    );
    (sub, snapshots)
}

fn labels(snapshot: &Snapshot) -> Vec<usize> {
    snapshot
        .documents
        .iter()
        .filter_map(|d| d.get("text").and_then(Value::as_str))
        .filter_map(|s| s.parse().ok())
        .collect()
}

proptest! {
    #[test]
    fn prop_snapshots_are_complete_and_ordered(seconds in prop::collection::vec(0i64..5, 1..30)) {
        let store = MemoryStore::new(SystemEnv::new());
        let (_sub, snapshots) = watch(&store);

        for (label, secs) in seconds.iter().enumerate() {
            prop_assert!(block_on(store.append(&path(), fields(label, *secs))).is_ok());
        }

        let snapshots = snapshots.lock().unwrap();
        prop_assert_eq!(snapshots.len(), seconds.len() + 1);

        for (writes, snapshot) in snapshots.iter().enumerate() {
            let mut expected: Vec<usize> = (0..writes).collect();
            expected.sort_by_key(|&label| (seconds[label], label));
            prop_assert_eq!(labels(snapshot), expected);
        }
    }

    #[test]
    fn prop_identical_timestamps_keep_insertion_order(count in 1usize..20) {
        let store = MemoryStore::new(SystemEnv::new());
        let (_sub, snapshots) = watch(&store);

        for label in 0..count {
            prop_assert!(block_on(store.append(&path(), fields(label, 42))).is_ok());
        }

        let snapshots = snapshots.lock().unwrap();
        let last = snapshots.last().map(labels).unwrap_or_default();
        prop_assert_eq!(last, (0..count).collect::<Vec<_>>());
    }
}

#[test]
fn two_watchers_see_the_same_snapshot() {
    let store = MemoryStore::new(SystemEnv::new());
    let (_a, first) = watch(&store);
    let (_b, second) = watch(&store);

    block_on(store.append(&path(), fields(0, 1))).unwrap();

    assert_eq!(first.lock().unwrap().last(), second.lock().unwrap().last());
}

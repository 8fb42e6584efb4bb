#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::{BTreeMap, HashMap},
    future::{Future, ready},
    sync::{Arc, Mutex, Weak},
};

use murmur_core::{
    CollectionPath, Document, DocumentId, DocumentStore, Environment, FieldValue, Fields, Listener,
    Query, Snapshot, StoreError, Subscription, Value, WatchEvent,
};

use super::StoreOptions;

/// Length of generated document identifiers.
const DOCUMENT_ID_LEN: usize = 20;

type SharedListener = Arc<dyn Fn(WatchEvent) + Send + Sync>;

/// In-memory document store for the terminal client and simulation
///
/// Documents are kept per collection in insertion order. Live queries are
/// re-evaluated from scratch on every write to their collection and delivered
/// as full snapshots, ordered ascending by the query field with ties broken by
/// insertion order. Documents missing the query field never match. All state is wrapped in `Arc<Mutex<>>` so clones share the
/// same collections and watchers.
///
/// Listeners are always invoked after the internal lock is released, so a
/// listener may call back into the store.
#[derive(Clone)]
pub struct MemoryStore<E: Environment> {
    inner: Arc<Mutex<MemoryStoreInner>>,
    env: E,
    options: StoreOptions,
}

struct MemoryStoreInner {
    /// Documents per collection, in insertion order
    collections: HashMap<CollectionPath, Vec<StoredDocument>>,

    /// Live queries by watcher ID
    watchers: HashMap<u64, Watcher>,

    next_watcher_id: u64,
    next_sequence: u64,
}

struct StoredDocument {
    /// Global insertion counter, the ordering tie-break
    sequence: u64,
    document: Document,
}

struct Watcher {
    query: Query,
    listener: SharedListener,
}

impl<E: Environment> MemoryStore<E> {
    /// Create an empty store.
    pub fn new(env: E) -> Self {
        Self::with_options(env, StoreOptions::default())
    }

    /// Create an empty store with explicit options.
    pub fn with_options(env: E, options: StoreOptions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                collections: HashMap::new(),
                watchers: HashMap::new(),
                next_watcher_id: 0,
                next_sequence: 0,
            })),
            env,
            options,
        }
    }

    /// Number of live queries.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn watcher_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").watchers.len()
    }

    /// Number of committed documents in a collection.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn document_count(&self, path: &CollectionPath) -> usize {
        self.inner.lock().expect("Mutex poisoned").collections.get(path).map_or(0, Vec::len)
    }

    /// Fail every live query with `error` and detach them.
    ///
    /// Models the backend revoking access or dropping the stream.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn fail_watchers(&self, error: &StoreError) {
        let listeners: Vec<SharedListener> = {
            let mut inner = self.inner.lock().expect("Mutex poisoned");
            inner.watchers.drain().map(|(_, w)| w.listener).collect()
        };

        tracing::debug!(count = listeners.len(), "failing live queries: {error}");
        for listener in listeners {
            listener(WatchEvent::Failed(error.clone()));
        }
    }

    /// Commit a write and notify watchers of its collection.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn commit(&self, path: &CollectionPath, fields: Fields) -> Result<DocumentId, StoreError> {
        if fields.is_empty() {
            return Err(StoreError::InvalidArgument("document has no fields".into()));
        }

        let id = DocumentId::new(self.env.random_id(DOCUMENT_ID_LEN));

        if self.options.latency_compensation {
            let pending = Document::new(id.clone(), resolve(&fields, Value::Null));
            let deliveries = {
                let inner = self.inner.lock().expect("Mutex poisoned");
                inner.snapshots_for(path, Some(&pending))
            };
            deliver(deliveries);
        }

        let now = Value::Timestamp(self.env.wall_clock());
        let document = Document::new(id.clone(), resolve(&fields, now));

        let deliveries = {
            let mut inner = self.inner.lock().expect("Mutex poisoned");
            let sequence = inner.next_sequence;
            inner.next_sequence += 1;
            inner
                .collections
                .entry(path.clone())
                .or_default()
                .push(StoredDocument { sequence, document });
            inner.snapshots_for(path, None)
        };

        tracing::debug!(%path, %id, watchers = deliveries.len(), "document committed");
        deliver(deliveries);

        Ok(id)
    }
}

impl MemoryStoreInner {
    /// Evaluate `query`, optionally with an uncommitted document at the end.
    ///
    /// Documents without the ordering field are left out. A pending server
    /// timestamp counts as present.
    fn evaluate(&self, query: &Query, pending: Option<&Document>) -> Snapshot {
        let mut stored: Vec<&StoredDocument> = self
            .collections
            .get(&query.path)
            .map(|docs| docs.iter().filter(|s| s.document.get(&query.order_by).is_some()).collect())
            .unwrap_or_default();

        stored.sort_by(|a, b| {
            let key_a = a.document.get(&query.order_by).unwrap_or(&Value::Null);
            let key_b = b.document.get(&query.order_by).unwrap_or(&Value::Null);
            key_a.cmp(key_b).then(a.sequence.cmp(&b.sequence))
        });

        let mut documents: Vec<Document> = stored.into_iter().map(|s| s.document.clone()).collect();
        if let Some(pending) = pending.filter(|d| d.get(&query.order_by).is_some()) {
            documents.push(pending.clone());
        }

        Snapshot::new(documents)
    }

    /// Snapshot for every watcher of `path`.
    fn snapshots_for(
        &self,
        path: &CollectionPath,
        pending: Option<&Document>,
    ) -> Vec<(SharedListener, Snapshot)> {
        self.watchers
            .values()
            .filter(|w| &w.query.path == path)
            .map(|w| (Arc::clone(&w.listener), self.evaluate(&w.query, pending)))
            .collect()
    }
}

/// Replace server timestamp sentinels with `resolved`.
fn resolve(fields: &Fields, resolved: Value) -> BTreeMap<String, Value> {
    fields
        .iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::Value(v) => v.clone(),
                FieldValue::ServerTimestamp => resolved.clone(),
            };
            (name.clone(), value)
        })
        .collect()
}

fn deliver(deliveries: Vec<(SharedListener, Snapshot)>) {
    for (listener, snapshot) in deliveries {
        listener(WatchEvent::Snapshot(snapshot));
    }
}

impl<E: Environment> DocumentStore for MemoryStore<E> {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn watch(&self, query: &Query, listener: Listener<WatchEvent>) -> Subscription {
        let listener: SharedListener = Arc::from(listener);

        let (watcher_id, initial) = {
            let mut inner = self.inner.lock().expect("Mutex poisoned");
            let watcher_id = inner.next_watcher_id;
            inner.next_watcher_id += 1;
            inner
                .watchers
                .insert(watcher_id, Watcher { query: query.clone(), listener: Arc::clone(&listener) });
            (watcher_id, inner.evaluate(query, None))
        };

        tracing::debug!(path = %query.path, watcher_id, "live query opened");
        listener(WatchEvent::Snapshot(initial));

        let inner: Weak<Mutex<MemoryStoreInner>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade()
                && let Ok(mut inner) = inner.lock()
                && inner.watchers.remove(&watcher_id).is_some()
            {
                tracing::debug!(watcher_id, "live query closed");
            }
        })
    }

    fn append(
        &self,
        path: &CollectionPath,
        fields: Fields,
    ) -> impl Future<Output = Result<DocumentId, StoreError>> + Send {
        ready(self.commit(path, fields))
    }
}

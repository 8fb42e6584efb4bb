//! Chaotic store wrapper for fault injection testing
//!
//! Store wrapper that randomly fails live queries and writes. Used by the
//! simulation harness to verify that the chat view surfaces subscription and
//! send failures without retrying them.

#![allow(clippy::disallowed_types, reason = "Locking simple RNG state")]

use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use murmur_core::{
    CollectionPath, DocumentId, DocumentStore, Fields, Listener, Query, StoreError, Subscription,
    WatchEvent,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Chaotic store wrapper that randomly injects failures
///
/// Delegates to an underlying store but fails operations based on a configured
/// failure rate. A failed `watch` delivers [`WatchEvent::Failed`] immediately
/// and never reaches the inner store. A failed `append` never commits.
#[derive(Clone)]
pub struct ChaoticStore<S: DocumentStore> {
    inner: S,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    /// Seeded so chaos runs are reproducible
    rng: Arc<Mutex<ChaCha8Rng>>,
    /// Number of injected failures
    injected: Arc<Mutex<usize>>,
}

impl<S: DocumentStore> ChaoticStore<S> {
    /// Create a new chaotic wrapper
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x1234_5678_9ABC_DEF0)
    }

    /// Create with explicit seed for reproducible chaos
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    #[allow(clippy::panic)]
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self {
            inner,
            failure_rate,
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            injected: Arc::new(Mutex::new(0)),
        }
    }

    /// Underlying store (for checking invariants after chaos).
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of operations failed so far.
    pub fn injected_failures(&self) -> usize {
        #[allow(clippy::expect_used)]
        *self.injected.lock().expect("injected counter mutex poisoned")
    }

    /// Roll the dice for one operation.
    fn should_fail(&self) -> bool {
        #[allow(clippy::expect_used)]
        let fail = self.rng.lock().expect("chaos rng mutex poisoned").gen_bool(self.failure_rate);

        if fail {
            #[allow(clippy::expect_used)]
            let mut injected = self.injected.lock().expect("injected counter mutex poisoned");
            *injected += 1;
        }
        fail
    }
}

impl<S: DocumentStore> DocumentStore for ChaoticStore<S> {
    fn watch(&self, query: &Query, listener: Listener<WatchEvent>) -> Subscription {
        if self.should_fail() {
            tracing::debug!(path = %query.path, "chaos: failing live query");
            listener(WatchEvent::Failed(StoreError::Unavailable("injected fault".into())));
            return Subscription::detached();
        }

        self.inner.watch(query, listener)
    }

    fn append(
        &self,
        path: &CollectionPath,
        fields: Fields,
    ) -> impl Future<Output = Result<DocumentId, StoreError>> + Send {
        let fail = self.should_fail();
        let inner = self.inner.clone();
        let path = path.clone();

        async move {
            if fail {
                tracing::debug!(%path, "chaos: failing append");
                return Err(StoreError::Unavailable("injected fault".into()));
            }
            inner.append(&path, fields).await
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use murmur_core::{Environment, NewMessage, Timestamp, UserId};

    use super::*;
    use crate::MemoryStore;

    #[derive(Clone, Default)]
    struct FixedEnv;

    impl Environment for FixedEnv {
        fn wall_clock(&self) -> Timestamp {
            Timestamp::new(0, 0)
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(7);
        }
    }

    fn fields() -> Fields {
        NewMessage::new("hi", UserId::new("u")).into_fields()
    }

    #[test]
    fn zero_rate_never_fails() {
        let store = ChaoticStore::new(MemoryStore::new(FixedEnv), 0.0);
        let path = CollectionPath::messages("x");

        for _ in 0..20 {
            assert!(block_on(store.append(&path, fields())).is_ok());
        }
        assert_eq!(store.injected_failures(), 0);
        assert_eq!(store.inner().document_count(&path), 20);
    }

    #[test]
    fn full_rate_always_fails() {
        let store = ChaoticStore::new(MemoryStore::new(FixedEnv), 1.0);
        let path = CollectionPath::messages("x");

        assert!(block_on(store.append(&path, fields())).is_err());
        assert_eq!(store.inner().document_count(&path), 0);

        let failed = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&failed);
        let sub = store.watch(
            &Query::ordered_by(path, "timestamp"),
            Box::new(move |event| {
                if let (WatchEvent::Failed(_), Ok(mut flag)) = (event, flag.lock()) {
                    *flag = true;
                }
            }),
        );

        assert!(!sub.is_active());
        assert!(*failed.lock().unwrap());
        assert_eq!(store.injected_failures(), 2);
    }

    #[test]
    fn same_seed_same_failures() {
        let run = |seed| {
            let store = ChaoticStore::with_seed(MemoryStore::new(FixedEnv), 0.5, seed);
            let path = CollectionPath::messages("x");
            (0..32).map(|_| block_on(store.append(&path, fields())).is_ok()).collect::<Vec<_>>()
        };

        assert_eq!(run(99), run(99));
    }

    #[test]
    fn half_rate_fails_some_writes() {
        let store = ChaoticStore::with_seed(MemoryStore::new(FixedEnv), 0.5, 7);
        let path = CollectionPath::messages("x");

        let committed = (0..64).filter(|_| block_on(store.append(&path, fields())).is_ok()).count();
        assert!(committed > 0 && committed < 64);
        assert_eq!(store.injected_failures(), 64 - committed);
        assert_eq!(store.inner().document_count(&path), committed);
    }

    #[test]
    #[should_panic(expected = "failure_rate must be between")]
    fn rejects_invalid_rate() {
        let _ = ChaoticStore::new(MemoryStore::new(FixedEnv), 1.5);
    }
}

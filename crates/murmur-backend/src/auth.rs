//! In-memory identity provider.

#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::HashMap,
    future::{Future, ready},
    sync::{Arc, Mutex},
};

use murmur_core::{AuthError, Environment, IdentityProvider, Listener, Subscription, UserId};

/// Length of generated anonymous user identifiers.
const USER_ID_LEN: usize = 28;

type SharedListener = Arc<dyn Fn(Option<UserId>) + Send + Sync>;

/// In-memory identity provider.
///
/// Holds at most one signed-in identity per instance and notifies every
/// registered listener when it changes. Clones share state.
#[derive(Clone)]
pub struct MemoryAuth<E: Environment> {
    inner: Arc<Mutex<AuthInner>>,
    env: E,
}

struct AuthInner {
    current: Option<UserId>,
    listeners: HashMap<u64, SharedListener>,
    next_listener_id: u64,
    allow_anonymous: bool,
}

impl<E: Environment> MemoryAuth<E> {
    /// Provider with no identity that accepts anonymous sign-in.
    pub fn new(env: E) -> Self {
        Self::build(env, None, true)
    }

    /// Provider that rejects anonymous sign-in.
    pub fn disabled(env: E) -> Self {
        Self::build(env, None, false)
    }

    /// Provider with an identity already signed in.
    pub fn with_user(env: E, user: UserId) -> Self {
        Self::build(env, Some(user), true)
    }

    fn build(env: E, current: Option<UserId>, allow_anonymous: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AuthInner {
                current,
                listeners: HashMap::new(),
                next_listener_id: 0,
                allow_anonymous,
            })),
            env,
        }
    }

    /// Currently signed-in identity.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn current_user(&self) -> Option<UserId> {
        self.inner.lock().expect("Mutex poisoned").current.clone()
    }

    /// Number of registered identity listeners.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn listener_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").listeners.len()
    }

    /// Sign the current identity out and notify listeners.
    pub fn sign_out(&self) {
        self.set_current(None);
    }

    /// Replace the current identity and notify every listener.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn set_current(&self, user: Option<UserId>) {
        let listeners: Vec<SharedListener> = {
            let mut inner = self.inner.lock().expect("Mutex poisoned");
            inner.current.clone_from(&user);
            inner.listeners.values().cloned().collect()
        };

        for listener in listeners {
            listener(user.clone());
        }
    }
}

impl<E: Environment> IdentityProvider for MemoryAuth<E> {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn subscribe(&self, listener: Listener<Option<UserId>>) -> Subscription {
        let listener: SharedListener = Arc::from(listener);

        let (listener_id, current) = {
            let mut inner = self.inner.lock().expect("Mutex poisoned");
            let listener_id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.insert(listener_id, Arc::clone(&listener));
            (listener_id, inner.current.clone())
        };

        listener(current);

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade()
                && let Ok(mut inner) = inner.lock()
            {
                inner.listeners.remove(&listener_id);
            }
        })
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn sign_in_anonymously(&self) -> impl Future<Output = Result<UserId, AuthError>> + Send {
        let allowed = self.inner.lock().expect("Mutex poisoned").allow_anonymous;
        if !allowed {
            tracing::warn!("anonymous sign-in rejected");
            return ready(Err(AuthError::OperationNotAllowed));
        }

        let user = UserId::new(self.env.random_id(USER_ID_LEN));
        tracing::debug!(%user, "anonymous sign-in");
        self.set_current(Some(user.clone()));

        ready(Ok(user))
    }
}

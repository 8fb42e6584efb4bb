//! Collaborator contracts.
//!
//! The chat view never talks to a concrete backend. It consumes two
//! collaborators through these traits:
//!
//! - [`IdentityProvider`]: identity-change notifications and anonymous
//!   sign-in
//! - [`DocumentStore`]: live ordered queries and appends
//!
//! Long-lived listeners are scoped: registering one returns a
//! [`Subscription`] that releases it when dropped.

use std::{fmt, future::Future};

use crate::{
    document::{CollectionPath, DocumentId, Fields, Query, Snapshot},
    error::{AuthError, StoreError},
    model::UserId,
};

/// Callback invoked by a collaborator for every notification.
pub type Listener<T> = Box<dyn Fn(T) + Send + Sync>;

/// Scoped listener registration.
///
/// Releases the listener exactly once, either through [`Subscription::cancel`]
/// or on drop.
#[must_use = "dropping a Subscription releases the listener immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Registration released by running `release`.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// Registration with nothing to release.
    ///
    /// Returned by collaborators that reject a listener outright.
    pub fn detached() -> Self {
        Self { release: None }
    }

    /// Listener has not been released yet.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Release the listener now.
    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

/// Notification delivered on a live query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Full current result set.
    Snapshot(Snapshot),
    /// Query failed. No further events follow.
    Failed(StoreError),
}

/// Authentication collaborator.
///
/// Must be Clone (shared between the runtime and spawned sign-in tasks) and
/// Send + Sync. Implementations typically share state via Arc.
pub trait IdentityProvider: Clone + Send + Sync + 'static {
    /// Register for identity changes.
    ///
    /// The listener receives the current identity (or `None`) right away and
    /// again after every change, until the returned subscription is released.
    fn subscribe(&self, listener: Listener<Option<UserId>>) -> Subscription;

    /// Sign in with a fresh anonymous identity.
    ///
    /// On success, identity listeners are notified of the new identity too.
    fn sign_in_anonymously(&self) -> impl Future<Output = Result<UserId, AuthError>> + Send;
}

/// Document store collaborator.
///
/// Must be Clone (shared between the runtime and spawned write tasks) and
/// Send + Sync.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Open a live query.
    ///
    /// The listener receives the current result set right away and a full
    /// snapshot after every change, until the subscription is released or a
    /// [`WatchEvent::Failed`] is delivered.
    fn watch(&self, query: &Query, listener: Listener<WatchEvent>) -> Subscription;

    /// Append one document to a collection.
    ///
    /// [`crate::FieldValue::ServerTimestamp`] fields are resolved by the
    /// store at commit time.
    fn append(
        &self,
        path: &CollectionPath,
        fields: Fields,
    ) -> impl Future<Output = Result<DocumentId, StoreError>> + Send;
}

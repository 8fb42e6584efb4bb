//! Session manager.
//!
//! Tracks the identity-change listener, the resolved identity and whether an
//! anonymous sign-in is in flight. Sign-in failures are never retried: a new
//! attempt starts only when the provider reports "no identity" again.

use murmur_core::UserId;

use crate::ViewAction;

/// Identity half of the chat view.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    /// Resolved identity. `None` until sign-in completes.
    user: Option<UserId>,
    /// Identity-change listener is registered.
    listening: bool,
    /// Anonymous sign-in is in flight.
    signing_in: bool,
}

impl SessionManager {
    /// Create a session manager with no identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved identity. `None` if nobody is signed in.
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Identity-change listener is registered.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Anonymous sign-in is in flight.
    pub fn is_signing_in(&self) -> bool {
        self.signing_in
    }

    /// Register the identity-change listener.
    ///
    /// Returns `None` if it is already registered.
    pub fn watch(&mut self) -> Option<ViewAction> {
        if self.listening {
            return None;
        }
        self.listening = true;
        Some(ViewAction::WatchIdentity)
    }

    /// Release the identity-change listener.
    ///
    /// Returns `None` if it was not registered.
    pub fn release(&mut self) -> Option<ViewAction> {
        if !self.listening {
            return None;
        }
        self.listening = false;
        Some(ViewAction::ReleaseIdentity)
    }

    /// Record a resolved identity.
    ///
    /// Returns `true` if the identity changed.
    pub fn resolve(&mut self, user: UserId) -> bool {
        self.signing_in = false;
        if self.user.as_ref() == Some(&user) {
            return false;
        }

        tracing::debug!(%user, "identity resolved");
        self.user = Some(user);
        true
    }

    /// Record that the provider has no identity.
    ///
    /// Returns the identity that was lost, if any.
    pub fn clear(&mut self) -> Option<UserId> {
        self.user.take()
    }

    /// Start anonymous sign-in.
    ///
    /// Returns `None` if an attempt is already in flight.
    pub fn begin_sign_in(&mut self) -> Option<ViewAction> {
        if self.signing_in {
            return None;
        }
        self.signing_in = true;
        Some(ViewAction::SignInAnonymously)
    }

    /// Sign-in attempt finished without an identity.
    pub fn sign_in_failed(&mut self) {
        self.signing_in = false;
    }
}

//! Error types.
//!
//! Collaborator failures ([`AuthError`], [`StoreError`]) and the view-level
//! taxonomy ([`ViewError`]) they are folded into:
//! - `Configuration`: backend setup missing or invalid (fatal)
//! - `Authentication`: anonymous sign-in failed (fatal)
//! - `Subscription`: the live query failed (fatal)
//! - `Send`: a write failed (non-fatal, the draft is kept)

use thiserror::Error;

/// Identity provider failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Anonymous sign-in is disabled for this backend.
    #[error("anonymous sign-in is not allowed")]
    OperationNotAllowed,

    /// The provider could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// Any other provider failure.
    #[error("{0}")]
    Other(String),
}

/// Document store failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Caller lacks access to the collection.
    #[error("missing or insufficient permissions")]
    PermissionDenied,

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Write request was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other store failure.
    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by the chat view.
///
/// The display text is exactly what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Backend configuration missing or invalid.
    #[error("Backend configuration is missing. Please check your environment variables.")]
    Configuration,

    /// Anonymous sign-in failed.
    #[error("Authentication failed: {0}")]
    Authentication(#[source] AuthError),

    /// The live message query failed.
    #[error("Failed to load messages: {0}")]
    Subscription(#[source] StoreError),

    /// Writing a message failed.
    #[error("Failed to send message: {0}")]
    Send(#[source] StoreError),
}

impl ViewError {
    /// Error ends the view. Only send failures leave it usable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Send(_))
    }
}

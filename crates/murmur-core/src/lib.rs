//! Core types for murmur
//!
//! Everything the chat view needs to talk about without touching I/O: the
//! message model, the document values exchanged with the store, the explicit
//! configuration struct and the contracts the external collaborators (identity
//! provider, document store) must honour.
//!
//! # Components
//!
//! - [`ChatConfig`]: deployment identifier and backend credentials
//! - [`Message`], [`NewMessage`], [`Timestamp`]: the chat data model
//! - [`Document`], [`Snapshot`], [`Value`], [`FieldValue`]: store documents
//! - [`IdentityProvider`], [`DocumentStore`]: collaborator traits
//! - [`Subscription`]: scoped listener guard released on drop
//! - [`Environment`]: wall clock and randomness

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod document;
pub mod env;
pub mod error;
pub mod model;

pub use backend::{DocumentStore, IdentityProvider, Listener, Subscription, WatchEvent};
pub use config::{BackendConfig, ChatConfig, DEFAULT_DEPLOYMENT_ID};
pub use document::{CollectionPath, Document, DocumentId, FieldValue, Fields, Query, Snapshot, Value};
pub use env::Environment;
pub use error::{AuthError, StoreError, ViewError};
pub use model::{Message, NewMessage, Timestamp, UserId};

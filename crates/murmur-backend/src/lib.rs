//! Reference collaborators for murmur.
//!
//! In-process implementations of the [`murmur_core::IdentityProvider`] and
//! [`murmur_core::DocumentStore`] contracts. They back the terminal client when
//! no remote backend is used and drive every simulation and integration test.
//!
//! # Components
//!
//! - [`MemoryStore`]: live ordered queries, appends, server timestamps
//! - [`ChaoticStore`]: fault-injecting wrapper around any store
//! - [`MemoryAuth`]: anonymous sign-in and identity listeners
//! - [`SystemEnv`]: production environment (wall clock, OS RNG)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
pub mod store;
mod system_env;

pub use auth::MemoryAuth;
pub use store::{ChaoticStore, MemoryStore, StoreOptions};
pub use system_env::SystemEnv;

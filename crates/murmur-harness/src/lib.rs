//! Deterministic simulation harness for the murmur chat view.
//!
//! Seeded implementations of the Environment trait and drivers that run the
//! real view against the in-process collaborators, for reproducible testing
//! of the subscription lifecycle, ordering and failure handling.
//!
//! # Runtimes
//!
//! - [`SimRuntime`]: synchronous, drains collaborator events on demand and can
//!   hold writes back to explore interleavings
//! - [`SimDriver`]: [`murmur_app::Driver`] implementation for running the real
//!   async [`murmur_app::Runtime`] on a paused tokio clock
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation. Operations are
//! applied to both the model and the real view, and their observable states
//! are compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Use [`InvariantRegistry::standard()`] for the chat view
//! invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod sim_driver;
pub mod sim_env;
pub mod sim_runtime;

pub use invariants::{
    ErrorReleasesListeners, FeedRequiresIdentity, Invariant, InvariantRegistry, InvariantResult,
    Phase, PhaseMonotonicity, TimestampOrder, ViewSnapshot, Violation,
};
pub use model::{
    ModelAuthor, ModelChat, ModelMessage, ObservableState, ObservedMessage, Operation,
    ParticipantId,
};
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError};
pub use sim_env::SimEnv;
pub use sim_runtime::{SimRuntime, SimStats};

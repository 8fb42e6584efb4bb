//! Reference model for model-based testing.
//!
//! Operations are applied to both the model and the real view, and their
//! observable states are compared.

mod chat;
mod operation;

pub use chat::{ModelAuthor, ModelChat, ModelMessage, ObservableState, ObservedMessage};
pub use operation::{Operation, ParticipantId};

//! Reference model of one chat view over a shared room.
//!
//! The model is the oracle against which the real view is verified. It keeps
//! the room as a plain list sorted by (timestamp, insertion), which is the
//! ordering contract of the store.

use murmur_core::Timestamp;

use super::operation::{Operation, ParticipantId};

/// Who wrote a model message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelAuthor {
    /// The view's user during the given session (0 = first sign-in).
    Session(u32),
    /// Another participant.
    Other(ParticipantId),
}

/// A committed message in the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMessage {
    /// Body text.
    pub text: String,
    /// Author.
    pub author: ModelAuthor,
    /// Server timestamp.
    pub timestamp: Timestamp,
}

/// One message as the user sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedMessage {
    /// Body text.
    pub text: String,
    /// Written by the current user.
    pub own: bool,
    /// Server timestamp.
    pub timestamp: Option<Timestamp>,
}

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Feed contents in display order.
    pub messages: Vec<ObservedMessage>,
    /// Draft text.
    pub draft: String,
}

/// Model chat - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelChat {
    /// Committed messages in (timestamp, insertion) order.
    messages: Vec<ModelMessage>,
    draft: String,
    session: u32,
    clock: Timestamp,
}

impl ModelChat {
    /// Empty room with the clock at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self { messages: Vec::new(), draft: String::new(), session: 0, clock: start }
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::Type { text } => self.draft.clone_from(text),
            Operation::Submit => {
                if !self.draft.trim().is_empty() {
                    let text = std::mem::take(&mut self.draft);
                    self.commit(text, ModelAuthor::Session(self.session));
                }
            },
            Operation::ExternalPost { author, text } => {
                self.commit(text.clone(), ModelAuthor::Other(*author));
            },
            Operation::AdvanceClock { seconds } => {
                self.clock = Timestamp::new(self.clock.seconds + i64::from(*seconds), self.clock.nanos);
            },
            Operation::SignOut => self.session += 1,
        }
    }

    /// Committed messages in display order.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// What the user should see.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            messages: self
                .messages
                .iter()
                .map(|m| ObservedMessage {
                    text: m.text.clone(),
                    own: m.author == ModelAuthor::Session(self.session),
                    timestamp: Some(m.timestamp),
                })
                .collect(),
            draft: self.draft.clone(),
        }
    }

    fn commit(&mut self, text: String, author: ModelAuthor) {
        // The clock never goes backwards, so appending keeps the order.
        self.messages.push(ModelMessage { text, author, timestamp: self.clock });
    }
}

//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the view at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use murmur_app::{ChatView, ViewState};
use murmur_core::{Message, UserId};

/// Coarse view state, for history tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for an identity.
    Loading,
    /// Interactive.
    Ready,
    /// Fatal error shown.
    Error,
}

impl From<&ViewState> for Phase {
    fn from(state: &ViewState) -> Self {
        match state {
            ViewState::Loading => Self::Loading,
            ViewState::Ready => Self::Ready,
            ViewState::Error(_) => Self::Error,
        }
    }
}

/// Snapshot of the view's observable state.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Resolved identity.
    pub user: Option<UserId>,
    /// Mirrored messages in display order.
    pub messages: Vec<Message>,
    /// Draft text.
    pub draft: String,
    /// A live query is open.
    pub feed_open: bool,
    /// The identity listener is registered.
    pub watching_identity: bool,
    /// Every phase observed so far, oldest first (for monotonicity checks).
    pub phase_history: Vec<Phase>,
}

impl ViewSnapshot {
    /// Capture the view's current state with an empty history.
    pub fn from_view(view: &ChatView) -> Self {
        let phase = Phase::from(view.state());
        Self {
            phase,
            user: view.user().cloned(),
            messages: view.messages().to_vec(),
            draft: view.draft().to_string(),
            feed_open: view.is_feed_open(),
            watching_identity: view.is_watching_identity(),
            phase_history: vec![phase],
        }
    }

    /// Replace the phase history.
    #[must_use]
    pub fn with_history(mut self, history: Vec<Phase>) -> Self {
        self.phase_history = history;
        self
    }
}

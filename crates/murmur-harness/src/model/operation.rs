//! Operations for model-based testing.
//!
//! Operations represent everything that can happen to one chat view and the
//! room around it. They are generated randomly by proptest and applied to
//! both the model and the real implementation.

/// Other participant identifier (kept small to keep the test space dense).
pub type ParticipantId = u8;

/// Operations that can be applied to the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Replace the draft.
    Type {
        /// New draft text.
        text: String,
    },

    /// Submit the draft.
    Submit,

    /// Another participant writes straight to the store.
    ExternalPost {
        /// Author.
        author: ParticipantId,
        /// Body text.
        text: String,
    },

    /// Advance the store's wall clock.
    ///
    /// Zero keeps the clock still, so later writes share a timestamp.
    AdvanceClock {
        /// Seconds to advance.
        seconds: u8,
    },

    /// The identity provider drops the current identity.
    ///
    /// The view signs in again with a fresh anonymous identity.
    SignOut,
}

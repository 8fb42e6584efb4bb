//! Observable view state.

use murmur_core::ViewError;

/// Top-level state of the chat view.
///
/// `Loading` moves to `Ready` once an identity resolves, or to `Error` on the
/// first fatal failure. `Error` is absorbing and nothing ever returns to
/// `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Waiting for an identity.
    Loading,
    /// Feed and composer are interactive.
    Ready,
    /// A fatal error replaced the whole view.
    Error(ViewError),
}

impl ViewState {
    /// Still waiting for an identity.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Feed and composer are interactive.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Fatal error, if one occurred.
    pub fn error(&self) -> Option<&ViewError> {
        match self {
            Self::Error(err) => Some(err),
            Self::Loading | Self::Ready => None,
        }
    }
}

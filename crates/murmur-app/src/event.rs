//! View input events.
//!
//! This module defines [`ViewEvent`], the set of inputs that drive the
//! [`crate::ChatView`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (keyboard, draft edits, submit) and system ticks.
//! - Collaborator notifications (identity changes, snapshots, write
//!   completions) delivered by the runtime.

use std::fmt;

use murmur_core::{AuthError, DocumentId, Snapshot, StoreError, UserId};

use crate::KeyInput;

/// Generation of the live query. Each opened feed gets a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedId(pub u64);

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feed#{}", self.0)
    }
}

/// Tag correlating a write with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SendId(pub u64);

impl fmt::Display for SendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "send#{}", self.0)
    }
}

/// Events processed by the view state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Draft replaced wholesale (text field change).
    DraftChanged(String),

    /// Submit the draft.
    Submit,

    /// Periodic tick.
    Tick,

    /// Display resized (columns, rows).
    Resize(u16, u16),

    /// Identity listener notification. `None` if nobody is signed in.
    IdentityChanged(Option<UserId>),

    /// Anonymous sign-in returned an identity.
    SignInSucceeded(UserId),

    /// Anonymous sign-in failed.
    SignInFailed(AuthError),

    /// Live query delivered a snapshot.
    FeedSnapshot {
        /// Query generation.
        feed: FeedId,
        /// Full ordered result set.
        snapshot: Snapshot,
    },

    /// Live query failed.
    FeedFailed {
        /// Query generation.
        feed: FeedId,
        /// Store failure.
        error: StoreError,
    },

    /// Write acknowledged.
    SendCompleted {
        /// Write tag.
        send: SendId,
        /// Identifier assigned by the store.
        id: DocumentId,
    },

    /// Write failed.
    SendFailed {
        /// Write tag.
        send: SendId,
        /// Store failure.
        error: StoreError,
    },

    /// View is going away. Releases all listeners.
    Unmount,
}

impl ViewEvent {
    /// User input aimed at the composer or the feed.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Key(_) | Self::DraftChanged(_) | Self::Submit)
    }
}

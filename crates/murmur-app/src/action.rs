//! View side-effects and intents.
//!
//! This module defines the [`ViewAction`] enum, the instructions produced by
//! the [`crate::ChatView`] state machine for the runtime to execute.

use murmur_core::{CollectionPath, NewMessage, Query};

use crate::{FeedId, SendId};

/// Severity of a [`ViewAction::Log`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Lifecycle detail.
    Debug,
    /// Notable but expected.
    Info,
    /// Unexpected, view unaffected.
    Warn,
    /// Operation failed.
    Error,
}

/// Manual feed scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Towards older messages.
    Up,
    /// Towards newer messages.
    Down,
}

/// Actions produced by the view state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Render the view.
    Render,

    /// Scroll the feed container to its last message.
    ScrollToBottom,

    /// Scroll the feed container one step.
    Scroll(ScrollDirection),

    /// Register the identity-change listener.
    WatchIdentity,

    /// Release the identity-change listener.
    ReleaseIdentity,

    /// Start anonymous sign-in.
    SignInAnonymously,

    /// Open the live message query.
    OpenFeed {
        /// Generation tag for events from this query.
        feed: FeedId,
        /// Ordered query to open.
        query: Query,
    },

    /// Release the live message query.
    CloseFeed {
        /// Generation to release.
        feed: FeedId,
    },

    /// Append a message to the collection.
    AppendMessage {
        /// Tag for the completion event.
        send: SendId,
        /// Target collection.
        path: CollectionPath,
        /// Outgoing message.
        message: NewMessage,
    },

    /// Write a diagnostic entry.
    Log {
        /// Severity.
        level: LogLevel,
        /// Entry text.
        message: String,
    },

    /// Leave the view.
    Quit,
}

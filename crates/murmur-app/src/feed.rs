//! Feed subscriber.
//!
//! Owns the local mirror of the message collection. Every snapshot replaces
//! the mirror wholesale; nothing is merged or patched, so local order is
//! exactly the store's order.

use murmur_core::{Message, Query, Snapshot};

use crate::{FeedId, ViewAction};

/// Feed half of the chat view.
#[derive(Debug, Clone)]
pub struct FeedSubscriber {
    /// Query opened for every generation.
    query: Query,
    /// Generation of the open live query. `None` if closed.
    open: Option<FeedId>,
    /// Next generation to hand out.
    next_feed: u64,
    /// Mirrored messages in store order.
    messages: Vec<Message>,
}

impl FeedSubscriber {
    /// Create a closed feed over `query`.
    pub fn new(query: Query) -> Self {
        Self { query, open: None, next_feed: 0, messages: Vec::new() }
    }

    /// Query this feed opens.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Generation of the open live query. `None` if closed.
    pub fn open_feed(&self) -> Option<FeedId> {
        self.open
    }

    /// A live query is open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Events tagged `feed` belong to the open live query.
    pub fn is_current(&self, feed: FeedId) -> bool {
        self.open == Some(feed)
    }

    /// Mirrored messages in store order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Open a new generation, closing the current one first.
    pub fn open(&mut self) -> Vec<ViewAction> {
        let mut actions: Vec<ViewAction> = self.close().into_iter().collect();

        let feed = FeedId(self.next_feed);
        self.next_feed += 1;
        self.open = Some(feed);

        tracing::debug!(%feed, path = %self.query.path, "opening feed");
        actions.push(ViewAction::OpenFeed { feed, query: self.query.clone() });
        actions
    }

    /// Close the open generation.
    ///
    /// Returns `None` if no live query is open.
    pub fn close(&mut self) -> Option<ViewAction> {
        let feed = self.open.take()?;
        tracing::debug!(%feed, "closing feed");
        Some(ViewAction::CloseFeed { feed })
    }

    /// Replace the mirror with the snapshot's contents.
    pub fn replace(&mut self, snapshot: &Snapshot) {
        self.messages = snapshot.documents.iter().map(Message::from_document).collect();
    }
}

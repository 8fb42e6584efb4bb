//! Composer.
//!
//! Owns the draft text and its cursor, and the set of writes still in flight.
//! The draft is cleared only when one of those writes is acknowledged; a
//! failed write leaves it untouched for re-sending.

use std::collections::BTreeSet;

use murmur_core::{CollectionPath, NewMessage, UserId};

use crate::{SendId, ViewAction};

/// Draft half of the chat view.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    /// Draft text.
    draft: String,
    /// Cursor position in characters.
    cursor: usize,
    /// Next write tag.
    next_send: u64,
    /// Writes awaiting acknowledgement.
    in_flight: BTreeSet<SendId>,
}

impl Composer {
    /// Create an empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft text.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Writes awaiting acknowledgement.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Replace the draft. The cursor moves to the end.
    pub fn set_draft(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.draft = text;
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.draft.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.draft.remove(at);
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.draft.remove(at);
        }
    }

    /// Move the cursor one character left.
    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one character right.
    pub fn right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor to the start.
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end.
    pub fn end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Prepare a write of the current draft by `user`.
    ///
    /// Returns `None`, leaving the draft untouched, if it is empty or only
    /// whitespace. The text is sent as typed, not trimmed.
    pub fn prepare(&mut self, user: UserId, path: CollectionPath) -> Option<ViewAction> {
        if self.draft.trim().is_empty() {
            return None;
        }

        let send = SendId(self.next_send);
        self.next_send += 1;
        self.in_flight.insert(send);

        tracing::debug!(%send, %path, "sending message");
        Some(ViewAction::AppendMessage {
            send,
            path,
            message: NewMessage::new(self.draft.clone(), user),
        })
    }

    /// A write was acknowledged. Clears the draft.
    ///
    /// Returns `false`, changing nothing, if `send` is not in flight.
    pub fn complete(&mut self, send: SendId) -> bool {
        if !self.in_flight.remove(&send) {
            return false;
        }
        self.draft.clear();
        self.cursor = 0;
        true
    }

    /// A write failed. The draft is kept.
    ///
    /// Returns `false` if `send` is not in flight.
    pub fn fail(&mut self, send: SendId) -> bool {
        self.in_flight.remove(&send)
    }

    fn char_len(&self) -> usize {
        self.draft.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.draft.char_indices().nth(chars).map_or(self.draft.len(), |(idx, _)| idx)
    }
}

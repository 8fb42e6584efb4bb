//! Chat data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentId, FieldValue, Fields, Value};

/// Field holding the message body.
pub const TEXT_FIELD: &str = "text";

/// Field holding the author identifier.
pub const USER_ID_FIELD: &str = "userId";

/// Field holding the server-assigned timestamp. The feed orders by it.
pub const TIMESTAMP_FIELD: &str = "timestamp";

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;
const SHORT_AUTHOR_LEN: usize = 8;

/// Point in time with nanosecond precision, seconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds, `< 1_000_000_000`.
    pub nanos: u32,
}

impl Timestamp {
    /// Create a timestamp.
    pub fn new(seconds: i64, nanos: u32) -> Self {
        debug_assert!(nanos < 1_000_000_000);
        Self { seconds, nanos }
    }

    /// UTC wall-clock hour and minute.
    pub fn hour_minute(&self) -> (u8, u8) {
        let secs_of_day = self.seconds.rem_euclid(SECS_PER_DAY);
        let hour = secs_of_day / SECS_PER_HOUR;
        let minute = (secs_of_day % SECS_PER_HOUR) / SECS_PER_MINUTE;
        (hour as u8, minute as u8)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour, minute) = self.hour_minute();
        write!(f, "{hour:02}:{minute:02}")
    }
}

/// Authenticated identity. Stable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message as mirrored from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Body text.
    pub text: String,
    /// Author identifier.
    pub user_id: String,
    /// Server time. `None` until the write is committed and echoed back.
    pub timestamp: Option<Timestamp>,
}

impl Message {
    /// Map a stored document into a message.
    ///
    /// Never fails: absent text or author fields become empty strings and an
    /// absent or non-timestamp `timestamp` field becomes `None`.
    pub fn from_document(document: &Document) -> Self {
        let text_of = |field: &str| {
            document.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
        };

        Self {
            id: document.id.clone(),
            text: text_of(TEXT_FIELD),
            user_id: text_of(USER_ID_FIELD),
            timestamp: document.get(TIMESTAMP_FIELD).and_then(Value::as_timestamp),
        }
    }

    /// Written by `user`.
    pub fn is_from(&self, user: &UserId) -> bool {
        self.user_id == user.as_str()
    }

    /// First characters of the author identifier, for compact display.
    pub fn short_author(&self) -> &str {
        self.user_id
            .char_indices()
            .nth(SHORT_AUTHOR_LEN)
            .map_or(self.user_id.as_str(), |(idx, _)| &self.user_id[..idx])
    }
}

/// An outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Body text, sent as typed.
    pub text: String,
    /// Author identifier.
    pub user_id: UserId,
}

impl NewMessage {
    /// Create an outgoing message.
    pub fn new(text: impl Into<String>, user_id: UserId) -> Self {
        Self { text: text.into(), user_id }
    }

    /// Write fields, with the timestamp left to the store.
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(TEXT_FIELD.to_string(), FieldValue::from(self.text));
        fields.insert(USER_ID_FIELD.to_string(), FieldValue::from(self.user_id.0));
        fields.insert(TIMESTAMP_FIELD.to_string(), FieldValue::ServerTimestamp);
        fields
    }
}

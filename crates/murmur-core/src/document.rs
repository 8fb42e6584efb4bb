//! Document store values.
//!
//! The store speaks in loosely typed documents: a document is an identifier
//! plus a map of named [`Value`]s. Writes use [`FieldValue`], which adds the
//! [`FieldValue::ServerTimestamp`] sentinel the store resolves with its own
//! clock at commit time.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::model::Timestamp;

/// Slash-separated path of a document collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Wrap an arbitrary collection path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Message collection for a deployment:
    /// `artifacts/{deployment_id}/public/data/messages`.
    pub fn messages(deployment_id: &str) -> Self {
        Self(format!("artifacts/{deployment_id}/public/data/messages"))
    }

    /// Path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned document identifier. Unique and stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored field value.
///
/// Variant order is the store's cross-type sort order: nulls sort first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or not yet resolved.
    Null,
    /// Point in time.
    Timestamp(Timestamp),
    /// UTF-8 text.
    String(String),
}

impl Value {
    /// Text content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Null | Self::Timestamp(_) => None,
        }
    }

    /// Timestamp content, if this is a timestamp.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::Null | Self::String(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Self::Timestamp(ts)
    }
}

/// A value in a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Concrete value stored as-is.
    Value(Value),
    /// Placeholder replaced by the store's clock at commit time.
    ServerTimestamp,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Value(Value::from(s))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Value(Value::String(s))
    }
}

impl From<Timestamp> for FieldValue {
    fn from(ts: Timestamp) -> Self {
        Self::Value(Value::Timestamp(ts))
    }
}

/// Fields of a write request, keyed by field name.
pub type Fields = BTreeMap<String, FieldValue>;

/// A stored document as delivered in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Stored fields.
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    /// Create a document from its identifier and fields.
    pub fn new(id: DocumentId, fields: BTreeMap<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Field value, `None` if the field is absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Full result set of a live query at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Documents in query order.
    pub documents: Vec<Document>,
}

impl Snapshot {
    /// Create a snapshot from ordered documents.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Snapshot contains no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Live query over one collection, ordered ascending by one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Collection to read.
    pub path: CollectionPath,
    /// Field to order by, ascending.
    pub order_by: String,
}

impl Query {
    /// Query `path` ordered ascending by `field`.
    pub fn ordered_by(path: CollectionPath, field: impl Into<String>) -> Self {
        Self { path, order_by: field.into() }
    }
}

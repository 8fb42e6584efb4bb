//! Property-based tests for document-to-message mapping.
//!
//! Snapshots may carry documents with any shape (missing fields, wrong types,
//! unresolved timestamps). Mapping must never drop or reject a document.

use std::collections::BTreeMap;

use murmur_core::{Document, DocumentId, Message, Timestamp, Value};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (any::<i64>(), 0u32..1_000_000_000).prop_map(|(s, n)| Value::Timestamp(Timestamp::new(s, n))),
        ".{0,24}".prop_map(Value::String),
    ]
}

fn document_strategy() -> impl Strategy<Value = Document> {
    let field = prop_oneof![
        Just("text".to_string()),
        Just("userId".to_string()),
        Just("timestamp".to_string()),
        "[a-z]{1,8}",
    ];

    ("[A-Za-z0-9]{20}", prop::collection::btree_map(field, value_strategy(), 0..6)).prop_map(
        |(id, fields): (String, BTreeMap<String, Value>)| Document::new(DocumentId::new(id), fields),
    )
}

proptest! {
    #[test]
    fn prop_mapping_keeps_identity(doc in document_strategy()) {
        let message = Message::from_document(&doc);
        prop_assert_eq!(&message.id, &doc.id);
    }

    #[test]
    fn prop_timestamp_only_from_timestamp_values(doc in document_strategy()) {
        let message = Message::from_document(&doc);
        let expected = doc.get("timestamp").and_then(Value::as_timestamp);
        prop_assert_eq!(message.timestamp, expected);
    }

    #[test]
    fn prop_short_author_is_prefix(doc in document_strategy()) {
        let message = Message::from_document(&doc);
        prop_assert!(message.user_id.starts_with(message.short_author()));
        prop_assert!(message.short_author().chars().count() <= 8);
    }
}

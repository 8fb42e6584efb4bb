//! Property-based tests for the ChatView state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences.
//! This ensures behavioral correctness across all possible execution paths.

use std::collections::BTreeMap;

use murmur_app::{ChatView, FeedId, KeyInput, SendId, ViewAction, ViewEvent};
use murmur_backend::{MemoryAuth, MemoryStore, StoreOptions};
use murmur_core::{
    AuthError, BackendConfig, ChatConfig, Document, DocumentId, Message, Snapshot, StoreError,
    Timestamp, UserId, Value,
};
use murmur_harness::{InvariantRegistry, Phase, SimEnv, SimRuntime, ViewSnapshot};
use proptest::prelude::*;

fn config() -> ChatConfig {
    ChatConfig::new("props", Some(BackendConfig { project_id: "p".into(), api_key: "k".into() }))
}

fn document_strategy() -> impl Strategy<Value = Document> {
    ("[a-z0-9]{4}", "[a-z ]{0,8}", prop::option::of(0i64..1_000)).prop_map(|(id, text, seconds)| {
        let mut fields = BTreeMap::new();
        fields.insert("text".to_string(), Value::from(text));
        fields.insert("userId".to_string(), Value::from("author"));
        fields.insert(
            "timestamp".to_string(),
            seconds.map_or(Value::Null, |s| Value::from(Timestamp::new(s, 0))),
        );
        Document::new(DocumentId::new(id), fields)
    })
}

/// Snapshots in store order: ascending timestamp, pending writes first.
fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    prop::collection::vec(document_strategy(), 0..6).prop_map(|mut documents| {
        documents.sort_by_key(|d| d.get("timestamp").and_then(Value::as_timestamp));
        Snapshot::new(documents)
    })
}

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        4 => "[a-z ]".prop_map(|s| KeyInput::Char(s.chars().next().unwrap_or(' '))),
        1 => Just(KeyInput::Enter),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Delete),
        1 => Just(KeyInput::Left),
        1 => Just(KeyInput::Right),
        1 => Just(KeyInput::Home),
        1 => Just(KeyInput::End),
        1 => Just(KeyInput::Up),
        1 => Just(KeyInput::Down),
    ]
}

/// Generate random view events, collaborator notifications included.
fn event_strategy() -> impl Strategy<Value = ViewEvent> {
    let user = prop_oneof![Just(UserId::new("alice")), Just(UserId::new("bob"))];
    prop_oneof![
        1 => Just(ViewEvent::Tick),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| ViewEvent::Resize(c, r)),
        4 => key_strategy().prop_map(ViewEvent::Key),
        1 => "[a-z ]{0,6}".prop_map(ViewEvent::DraftChanged),
        2 => Just(ViewEvent::Submit),
        2 => prop::option::of(user.clone()).prop_map(ViewEvent::IdentityChanged),
        1 => user.prop_map(ViewEvent::SignInSucceeded),
        1 => Just(ViewEvent::SignInFailed(AuthError::Network("offline".into()))),
        3 => (0u64..4, snapshot_strategy())
            .prop_map(|(feed, snapshot)| ViewEvent::FeedSnapshot { feed: FeedId(feed), snapshot }),
        1 => (0u64..4).prop_map(|feed| ViewEvent::FeedFailed {
            feed: FeedId(feed),
            error: StoreError::PermissionDenied,
        }),
        1 => (0u64..4).prop_map(|send| ViewEvent::SendCompleted {
            send: SendId(send),
            id: DocumentId::new("x"),
        }),
        1 => (0u64..4).prop_map(|send| ViewEvent::SendFailed {
            send: SendId(send),
            error: StoreError::Unavailable("offline".into()),
        }),
    ]
}

proptest! {
    #[test]
    fn prop_view_invariants_hold(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut view = ChatView::new(config());
        let invariants = InvariantRegistry::standard();
        let mut history = vec![Phase::from(view.state())];

        let _ = view.mount();
        for event in events {
            let _ = view.handle(event);

            let phase = Phase::from(view.state());
            if history.last() != Some(&phase) {
                history.push(phase);
            }
            let snapshot = ViewSnapshot::from_view(&view).with_history(history.clone());
            prop_assert!(invariants.check_all(&snapshot).is_ok(), "{:?}", invariants.check_all(&snapshot));
        }
    }

    #[test]
    fn prop_snapshots_replace_not_merge(snapshots in prop::collection::vec(snapshot_strategy(), 1..6)) {
        let mut view = ChatView::new(config());
        let _ = view.mount();
        let _ = view.handle(ViewEvent::IdentityChanged(Some(UserId::new("alice"))));

        for snapshot in &snapshots {
            let actions = view.handle(ViewEvent::FeedSnapshot { feed: FeedId(0), snapshot: snapshot.clone() });
            prop_assert_eq!(actions.first(), Some(&ViewAction::ScrollToBottom));

            let expected: Vec<Message> = snapshot.documents.iter().map(Message::from_document).collect();
            prop_assert_eq!(view.messages(), expected.as_slice());
        }
    }

    #[test]
    fn prop_blank_draft_never_sends(draft in "[ \t]{0,8}") {
        let mut view = ChatView::new(config());
        let _ = view.mount();
        let _ = view.handle(ViewEvent::IdentityChanged(Some(UserId::new("alice"))));
        let _ = view.handle(ViewEvent::DraftChanged(draft.clone()));

        let submit = view.handle(ViewEvent::Submit);
        let enter = view.handle(ViewEvent::Key(KeyInput::Enter));

        prop_assert!(submit.is_empty());
        prop_assert!(enter.is_empty());
        prop_assert_eq!(view.draft(), draft.as_str());
        prop_assert_eq!(view.sends_in_flight(), 0);
    }

    #[test]
    fn prop_failed_sign_in_never_opens_feed(events in prop::collection::vec(event_strategy(), 0..30)) {
        let mut view = ChatView::new(config());
        let mut actions = view.mount();
        actions.extend(view.handle(ViewEvent::IdentityChanged(None)));
        actions.extend(view.handle(ViewEvent::SignInFailed(AuthError::OperationNotAllowed)));

        for event in events {
            actions.extend(view.handle(event));
        }

        prop_assert!(view.state().error().is_some());
        prop_assert!(!view.is_feed_open());
        prop_assert!(!actions.iter().any(|a| matches!(a, ViewAction::OpenFeed { .. })), "an OpenFeed action was emitted");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Sends stay out of the feed until the store echoes them back, and each
    /// one clears the draft exactly once.
    #[test]
    fn prop_send_waits_for_echo(
        seed in any::<u64>(),
        texts in prop::collection::vec("[a-z]{1,6}", 1..5),
        latency_compensation in any::<bool>()
    ) {
        let env = SimEnv::with_seed(seed);
        let store = MemoryStore::with_options(env.clone(), StoreOptions { latency_compensation });
        let mut sim = SimRuntime::new(ChatView::new(config()), MemoryAuth::new(env.clone()), store)
            .with_invariants(InvariantRegistry::standard());
        sim.mount();

        for (i, text) in texts.iter().enumerate() {
            sim.hold_writes();
            sim.dispatch(ViewEvent::DraftChanged(text.clone()));
            sim.dispatch(ViewEvent::Submit);

            prop_assert_eq!(sim.view().messages().len(), i);
            prop_assert_eq!(sim.view().draft(), text.as_str());

            env.advance(1, 0);
            sim.release_writes();

            prop_assert_eq!(sim.view().messages().len(), i + 1);
            prop_assert_eq!(sim.view().draft(), "");
            prop_assert!(sim.view().messages().iter().all(|m| m.timestamp.is_some()));
        }

        let texts_seen: Vec<_> = sim.view().messages().iter().map(|m| m.text.clone()).collect();
        prop_assert_eq!(texts_seen, texts);
    }
}

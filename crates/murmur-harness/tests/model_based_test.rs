//! Model-based property tests.
//!
//! These tests generate random operation sequences and verify that the real
//! view behaves identically to the reference model.
//!
//! # Architecture
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelChat      RealChat        Compare
//!      (reference)   (SimRuntime)  observable state
//! ```

use futures::executor::block_on;
use murmur_app::{ChatView, ViewEvent};
use murmur_backend::{MemoryAuth, MemoryStore};
use murmur_core::{
    BackendConfig, ChatConfig, DocumentStore, NewMessage, Timestamp, UserId,
};
use murmur_harness::{
    InvariantRegistry, ModelChat, ObservableState, ObservedMessage, Operation, SimEnv, SimRuntime,
};
use proptest::prelude::*;

const START: Timestamp = Timestamp { seconds: 1_704_067_200, nanos: 0 };

/// Real system wrapper that mirrors `ModelChat`'s interface.
struct RealChat {
    env: SimEnv,
    sim: SimRuntime<MemoryAuth<SimEnv>, MemoryStore<SimEnv>>,
}

impl RealChat {
    fn new(seed: u64) -> Self {
        let env = SimEnv::starting_at(seed, START);
        let config = ChatConfig::new(
            "model",
            Some(BackendConfig { project_id: "p".into(), api_key: "k".into() }),
        );
        let mut sim = SimRuntime::new(
            ChatView::new(config),
            MemoryAuth::new(env.clone()),
            MemoryStore::new(env.clone()),
        )
        .with_invariants(InvariantRegistry::standard());
        sim.mount();
        Self { env, sim }
    }

    fn apply(&mut self, op: &Operation) {
        match op {
            Operation::Type { text } => self.sim.dispatch(ViewEvent::DraftChanged(text.clone())),
            Operation::Submit => self.sim.dispatch(ViewEvent::Submit),
            Operation::ExternalPost { author, text } => {
                let message = NewMessage::new(text.clone(), UserId::new(format!("participant-{author}")));
                let path = self.sim.view().collection_path();
                let result = block_on(self.sim.store().append(&path, message.into_fields()));
                assert!(result.is_ok(), "external post failed: {result:?}");
                self.sim.settle();
            },
            Operation::AdvanceClock { seconds } => self.env.advance(i64::from(*seconds), 0),
            Operation::SignOut => {
                self.sim.identity().sign_out();
                self.sim.settle();
            },
        }
    }

    fn observable_state(&self) -> ObservableState {
        let view = self.sim.view();
        ObservableState {
            messages: view
                .messages()
                .iter()
                .map(|m| ObservedMessage {
                    text: m.text.clone(),
                    own: view.user().is_some_and(|user| m.is_from(user)),
                    timestamp: m.timestamp,
                })
                .collect(),
            draft: view.draft().to_string(),
        }
    }
}

/// Strategy for short texts, blank ones included.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z]{1,6}( [a-z]{1,6})?",
        1 => "[ \t]{0,3}",
    ]
}

/// Strategy for generating operations.
fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        // Weight towards more interesting operations
        4 => text_strategy().prop_map(|text| Operation::Type { text }),
        4 => Just(Operation::Submit),
        2 => (0u8..3, text_strategy())
            .prop_map(|(author, text)| Operation::ExternalPost { author, text }),
        2 => (0u8..3).prop_map(|seconds| Operation::AdvanceClock { seconds }),
        1 => Just(Operation::SignOut),
    ]
}

proptest! {
    /// Verify that the view shows exactly what the model predicts.
    #[test]
    fn prop_model_matches_real(
        seed in any::<u64>(),
        ops in prop::collection::vec(operation_strategy(), 0..40)
    ) {
        let mut model = ModelChat::new(START);
        let mut real = RealChat::new(seed);

        for (i, op) in ops.iter().enumerate() {
            model.apply(op);
            real.apply(op);

            prop_assert_eq!(
                model.observable_state(),
                real.observable_state(),
                "Divergence at operation {}: {:?}", i, op
            );
        }

        prop_assert!(real.sim.view().state().is_ready());
        prop_assert_eq!(real.sim.stats().feeds_opened, real.sim.stats().sign_ins);
    }
}

#[test]
fn identical_timestamps_keep_insertion_order() {
    let ops = [
        Operation::Type { text: "first".into() },
        Operation::Submit,
        Operation::ExternalPost { author: 1, text: "second".into() },
        Operation::Type { text: "third".into() },
        Operation::Submit,
    ];

    let mut model = ModelChat::new(START);
    let mut real = RealChat::new(9);
    for op in &ops {
        model.apply(op);
        real.apply(op);
    }

    let texts: Vec<_> = real.sim.view().messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
    assert!(real.sim.view().messages().iter().all(|m| m.timestamp == Some(START)));
    assert_eq!(model.observable_state(), real.observable_state());
}

//! Synchronous runtime for simulation.
//!
//! `SimRuntime` executes [`ViewAction`]s exactly like [`murmur_app::Runtime`]
//! but without an async event loop: collaborator futures are driven to
//! completion on the spot and every resulting event is queued in one inbox,
//! which [`SimRuntime::settle`] drains. Writes can be held back to explore
//! interleavings between snapshots and write completions.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use futures::executor::block_on;
use murmur_app::{ChatView, FeedId, KeyInput, LogLevel, SendId, ViewAction, ViewEvent};
use murmur_core::{
    CollectionPath, DocumentStore, IdentityProvider, NewMessage, Subscription, WatchEvent,
};

use crate::invariants::{InvariantRegistry, Phase, ViewSnapshot};

type Inbox = Arc<Mutex<VecDeque<ViewEvent>>>;

/// Counters for side effects the runtime executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Render actions.
    pub renders: usize,
    /// Scroll-to-bottom actions.
    pub scrolls_to_bottom: usize,
    /// Anonymous sign-in attempts.
    pub sign_ins: usize,
    /// Live queries opened.
    pub feeds_opened: usize,
    /// Writes started.
    pub appends: usize,
    /// Errors logged.
    pub errors_logged: usize,
}

/// A write waiting to be released.
struct HeldWrite {
    send: SendId,
    path: CollectionPath,
    message: NewMessage,
}

/// Synchronous runtime driving a [`ChatView`] against in-process
/// collaborators.
pub struct SimRuntime<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    view: ChatView,
    identity: P,
    store: S,
    inbox: Inbox,
    identity_listener: Option<Subscription>,
    feed: Option<(FeedId, Subscription)>,
    /// Writes held back. `None` if writes run immediately.
    held: Option<VecDeque<HeldWrite>>,
    stats: SimStats,
    history: Vec<Phase>,
    invariants: Option<InvariantRegistry>,
    quit: bool,
}

impl<P, S> SimRuntime<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    /// Create a runtime around an unmounted view.
    pub fn new(view: ChatView, identity: P, store: S) -> Self {
        let history = vec![Phase::from(view.state())];
        Self {
            view,
            identity,
            store,
            inbox: Arc::new(Mutex::new(VecDeque::new())),
            identity_listener: None,
            feed: None,
            held: None,
            stats: SimStats::default(),
            history,
            invariants: None,
            quit: false,
        }
    }

    /// Enable invariant checking after every event.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Mount the view and settle.
    pub fn mount(&mut self) {
        let actions = self.view.mount();
        self.after_step("mount");
        self.execute(actions);
        self.settle();
    }

    /// Hand one event to the view and settle.
    pub fn dispatch(&mut self, event: ViewEvent) {
        self.step(event);
        self.settle();
    }

    /// Type `text` key by key.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.dispatch(ViewEvent::Key(KeyInput::Char(c)));
        }
    }

    /// Process queued collaborator events until none are left.
    pub fn settle(&mut self) {
        while let Some(event) = self.pop() {
            self.step(event);
        }
    }

    /// Hold writes back instead of running them.
    pub fn hold_writes(&mut self) {
        if self.held.is_none() {
            self.held = Some(VecDeque::new());
        }
    }

    /// Run every held write, stop holding and settle.
    pub fn release_writes(&mut self) {
        for write in self.held.take().unwrap_or_default() {
            self.append(write);
        }
        self.settle();
    }

    /// Writes currently held back.
    pub fn held_writes(&self) -> usize {
        self.held.as_ref().map_or(0, VecDeque::len)
    }

    /// Side-effect counters.
    pub fn stats(&self) -> SimStats {
        self.stats
    }

    /// The view asked to quit.
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Identity listener is held.
    pub fn is_watching_identity(&self) -> bool {
        self.identity_listener.is_some()
    }

    /// Generation of the held live query. `None` if closed.
    pub fn open_feed(&self) -> Option<FeedId> {
        self.feed.as_ref().map(|(feed, _)| *feed)
    }

    /// Get a reference to the view
    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// Get a reference to the identity provider
    pub fn identity(&self) -> &P {
        &self.identity
    }

    /// Get a reference to the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the view including its phase history.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::from_view(&self.view).with_history(self.history.clone())
    }

    fn step(&mut self, event: ViewEvent) {
        let context = format!("after {event:?}");
        let actions = self.view.handle(event);
        self.after_step(&context);
        self.execute(actions);
    }

    fn after_step(&mut self, context: &str) {
        let phase = Phase::from(self.view.state());
        if self.history.last() != Some(&phase) {
            self.history.push(phase);
        }
        if let Some(registry) = &self.invariants {
            registry.assert_all(&self.snapshot(), context);
        }
    }

    fn execute(&mut self, actions: Vec<ViewAction>) {
        for action in actions {
            match action {
                ViewAction::Render => self.stats.renders += 1,
                ViewAction::ScrollToBottom => self.stats.scrolls_to_bottom += 1,
                ViewAction::Scroll(_) => {},
                ViewAction::WatchIdentity => {
                    let inbox = Arc::clone(&self.inbox);
                    self.identity_listener = Some(self.identity.subscribe(Box::new(move |user| {
                        enqueue(&inbox, ViewEvent::IdentityChanged(user));
                    })));
                },
                ViewAction::ReleaseIdentity => self.identity_listener = None,
                ViewAction::SignInAnonymously => {
                    self.stats.sign_ins += 1;
                    let event = match block_on(self.identity.sign_in_anonymously()) {
                        Ok(user) => ViewEvent::SignInSucceeded(user),
                        Err(error) => ViewEvent::SignInFailed(error),
                    };
                    enqueue(&self.inbox, event);
                },
                ViewAction::OpenFeed { feed, query } => {
                    self.stats.feeds_opened += 1;
                    let inbox = Arc::clone(&self.inbox);
                    let subscription = self.store.watch(
                        &query,
                        Box::new(move |event| {
                            let event = match event {
                                WatchEvent::Snapshot(snapshot) => {
                                    ViewEvent::FeedSnapshot { feed, snapshot }
                                },
                                WatchEvent::Failed(error) => ViewEvent::FeedFailed { feed, error },
                            };
                            enqueue(&inbox, event);
                        }),
                    );
                    self.feed = Some((feed, subscription));
                },
                ViewAction::CloseFeed { feed } => {
                    if self.open_feed() == Some(feed) {
                        self.feed = None;
                    }
                },
                ViewAction::AppendMessage { send, path, message } => {
                    self.stats.appends += 1;
                    let write = HeldWrite { send, path, message };
                    match &mut self.held {
                        Some(held) => held.push_back(write),
                        None => self.append(write),
                    }
                },
                ViewAction::Log { level, message } => {
                    if level == LogLevel::Error {
                        self.stats.errors_logged += 1;
                    }
                    tracing::debug!(?level, "{message}");
                },
                ViewAction::Quit => self.quit = true,
            }
        }
    }

    fn append(&self, write: HeldWrite) {
        let HeldWrite { send, path, message } = write;
        let event = match block_on(self.store.append(&path, message.into_fields())) {
            Ok(id) => ViewEvent::SendCompleted { send, id },
            Err(error) => ViewEvent::SendFailed { send, error },
        };
        enqueue(&self.inbox, event);
    }

    #[allow(clippy::expect_used)]
    fn pop(&self) -> Option<ViewEvent> {
        self.inbox.lock().expect("inbox mutex poisoned").pop_front()
    }
}

#[allow(clippy::expect_used)]
fn enqueue(inbox: &Inbox, event: ViewEvent) {
    inbox.lock().expect("inbox mutex poisoned").push_back(event);
}

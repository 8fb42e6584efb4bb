//! Chat view state machine.
//!
//! [`ChatView`] composes the [`SessionManager`], [`FeedSubscriber`] and
//! [`Composer`] behind one render surface. It is a pure state machine: it
//! consumes [`ViewEvent`] inputs and produces [`ViewAction`] instructions for
//! the runtime to execute. Nothing here touches a collaborator directly.
//!
//! # Lifecycle
//!
//! ```text
//! mount ──► Loading ──identity──► Ready
//!              │                    │
//!              └──fatal failure──►  Error (absorbing)
//! ```
//!
//! The feed opens only while an identity is resolved and the view is
//! `Ready`. Entering `Error` releases both listeners.

use murmur_core::{
    AuthError, ChatConfig, CollectionPath, Message, Query, Snapshot, StoreError, UserId, ViewError,
    model::TIMESTAMP_FIELD,
};

use crate::{
    Composer, FeedId, FeedSubscriber, KeyInput, LogLevel, ScrollDirection, SendId,
    SessionManager, ViewAction, ViewEvent, ViewState,
};

/// Chat view state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct ChatView {
    /// Configuration passed at construction.
    config: ChatConfig,
    /// Top-level view state.
    state: ViewState,
    /// Identity half.
    session: SessionManager,
    /// Live query half.
    feed: FeedSubscriber,
    /// Draft half.
    composer: Composer,
    /// Transient notice line. `None` if nothing to show.
    notice: Option<String>,
    /// Mounted and accepting events.
    mounted: bool,
    /// Display dimensions (columns, rows).
    size: (u16, u16),
}

impl ChatView {
    /// Create an unmounted view.
    pub fn new(config: ChatConfig) -> Self {
        let query = Query::ordered_by(config.collection_path(), TIMESTAMP_FIELD);
        Self {
            config,
            state: ViewState::Loading,
            session: SessionManager::new(),
            feed: FeedSubscriber::new(query),
            composer: Composer::new(),
            notice: None,
            mounted: false,
            size: (80, 24),
        }
    }

    /// Mount the view.
    ///
    /// Checks the configuration first; an unconfigured backend enters the
    /// error state without registering anything. Mounting twice is a no-op.
    pub fn mount(&mut self) -> Vec<ViewAction> {
        if self.mounted {
            return vec![];
        }
        self.mounted = true;

        if !self.config.is_configured() {
            return self.fail(ViewError::Configuration);
        }

        let mut actions: Vec<ViewAction> = self.session.watch().into_iter().collect();
        actions.push(ViewAction::Render);
        actions
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: ViewEvent) -> Vec<ViewAction> {
        if !self.mounted {
            tracing::trace!(?event, "view not mounted, ignoring event");
            return vec![];
        }

        if let ViewEvent::Unmount = event {
            return self.unmount();
        }

        if self.state.error().is_some() {
            return match event {
                ViewEvent::Key(KeyInput::Esc) => vec![ViewAction::Quit],
                ViewEvent::Resize(cols, rows) => {
                    self.size = (cols, rows);
                    vec![ViewAction::Render]
                },
                _ => vec![],
            };
        }

        if !self.state.is_ready() && event.is_input() {
            if let ViewEvent::Key(KeyInput::Esc) = event {
                return vec![ViewAction::Quit];
            }
            tracing::trace!(?event, "view not ready, ignoring input");
            return vec![];
        }

        match event {
            ViewEvent::Key(key) => self.handle_key(key),
            ViewEvent::DraftChanged(text) => {
                self.composer.set_draft(text);
                vec![ViewAction::Render]
            },
            ViewEvent::Submit => self.submit(),
            ViewEvent::Tick => vec![],
            ViewEvent::Resize(cols, rows) => {
                self.size = (cols, rows);
                vec![ViewAction::Render]
            },
            ViewEvent::IdentityChanged(Some(user)) | ViewEvent::SignInSucceeded(user) => {
                self.identity_resolved(user)
            },
            ViewEvent::IdentityChanged(None) => self.identity_lost(),
            ViewEvent::SignInFailed(error) => self.sign_in_failed(error),
            ViewEvent::FeedSnapshot { feed, snapshot } => self.feed_snapshot(feed, &snapshot),
            ViewEvent::FeedFailed { feed, error } => self.feed_failed(feed, error),
            ViewEvent::SendCompleted { send, id } => {
                if !self.composer.complete(send) {
                    tracing::debug!(%send, "completion for unknown send");
                    return vec![];
                }
                tracing::debug!(%send, %id, "message stored");
                self.notice = None;
                vec![ViewAction::Render]
            },
            ViewEvent::SendFailed { send, error } => self.send_failed(send, error),
            ViewEvent::Unmount => vec![],
        }
    }

    /// Submit the current draft.
    ///
    /// A no-op unless the view is `Ready` with a configured backend, a
    /// resolved identity and a draft that is not blank.
    pub fn submit(&mut self) -> Vec<ViewAction> {
        if !self.state.is_ready() || !self.config.is_configured() {
            return vec![];
        }
        let Some(user) = self.session.user().cloned() else {
            return vec![];
        };

        self.composer.prepare(user, self.config.collection_path()).into_iter().collect()
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<ViewAction> {
        match key {
            KeyInput::Esc => return vec![ViewAction::Quit],
            KeyInput::Enter => return self.submit(),
            KeyInput::Up => return vec![ViewAction::Scroll(ScrollDirection::Up), ViewAction::Render],
            KeyInput::Down => {
                return vec![ViewAction::Scroll(ScrollDirection::Down), ViewAction::Render];
            },
            KeyInput::Char(c) => self.composer.insert(c),
            KeyInput::Backspace => self.composer.backspace(),
            KeyInput::Delete => self.composer.delete(),
            KeyInput::Left => self.composer.left(),
            KeyInput::Right => self.composer.right(),
            KeyInput::Home => self.composer.home(),
            KeyInput::End => self.composer.end(),
        }
        vec![ViewAction::Render]
    }

    fn identity_resolved(&mut self, user: UserId) -> Vec<ViewAction> {
        if !self.session.resolve(user) {
            return vec![];
        }

        self.state = ViewState::Ready;
        let mut actions = self.feed.open();
        actions.push(ViewAction::Render);
        actions
    }

    fn identity_lost(&mut self) -> Vec<ViewAction> {
        let mut actions = Vec::new();

        if let Some(user) = self.session.clear() {
            tracing::debug!(%user, "identity lost");
            actions.extend(self.feed.close());
            actions.push(ViewAction::Render);
        }
        actions.extend(self.session.begin_sign_in());
        actions
    }

    fn sign_in_failed(&mut self, error: AuthError) -> Vec<ViewAction> {
        self.session.sign_in_failed();
        if self.session.user().is_some() {
            tracing::debug!(%error, "sign-in failed after identity resolved");
            return vec![];
        }
        self.fail(ViewError::Authentication(error))
    }

    fn feed_snapshot(&mut self, feed: FeedId, snapshot: &Snapshot) -> Vec<ViewAction> {
        if !self.feed.is_current(feed) {
            tracing::trace!(%feed, "dropping snapshot from closed feed");
            return vec![];
        }

        self.feed.replace(snapshot);
        vec![ViewAction::ScrollToBottom, ViewAction::Render]
    }

    fn feed_failed(&mut self, feed: FeedId, error: StoreError) -> Vec<ViewAction> {
        if !self.feed.is_current(feed) {
            return vec![];
        }
        self.fail(ViewError::Subscription(error))
    }

    fn send_failed(&mut self, send: SendId, error: StoreError) -> Vec<ViewAction> {
        if !self.composer.fail(send) {
            return vec![];
        }

        let error = ViewError::Send(error);
        let message = error.to_string();
        self.notice = Some(message.clone());
        vec![ViewAction::Log { level: LogLevel::Error, message }, ViewAction::Render]
    }

    /// Enter the absorbing error state, releasing both listeners.
    fn fail(&mut self, error: ViewError) -> Vec<ViewAction> {
        let mut actions =
            vec![ViewAction::Log { level: LogLevel::Error, message: error.to_string() }];
        actions.extend(self.feed.close());
        actions.extend(self.session.release());

        self.state = ViewState::Error(error);
        actions.push(ViewAction::Render);
        actions
    }

    fn unmount(&mut self) -> Vec<ViewAction> {
        let mut actions: Vec<ViewAction> = self.feed.close().into_iter().collect();
        actions.extend(self.session.release());
        self.mounted = false;
        actions
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Configuration passed at construction.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Resolved identity. `None` until sign-in completes.
    pub fn user(&self) -> Option<&UserId> {
        self.session.user()
    }

    /// Mirrored messages in store order.
    pub fn messages(&self) -> &[Message] {
        self.feed.messages()
    }

    /// Draft text.
    pub fn draft(&self) -> &str {
        self.composer.draft()
    }

    /// Draft cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.composer.cursor()
    }

    /// Transient notice line. `None` if nothing to show.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// A live query is open.
    pub fn is_feed_open(&self) -> bool {
        self.feed.is_open()
    }

    /// Generation of the open live query. `None` if closed.
    pub fn open_feed(&self) -> Option<FeedId> {
        self.feed.open_feed()
    }

    /// Identity listener is registered.
    pub fn is_watching_identity(&self) -> bool {
        self.session.is_listening()
    }

    /// Writes awaiting acknowledgement.
    pub fn sends_in_flight(&self) -> usize {
        self.composer.in_flight()
    }

    /// Collection the feed reads and the composer writes.
    pub fn collection_path(&self) -> CollectionPath {
        self.config.collection_path()
    }

    /// Mounted and accepting events.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Display dimensions (columns, rows).
    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use murmur_core::{BackendConfig, Document, DocumentId, Timestamp, Value};

    use super::*;

    fn config() -> ChatConfig {
        ChatConfig::new(
            "test-app",
            Some(BackendConfig { project_id: "p".into(), api_key: "k".into() }),
        )
    }

    fn mounted() -> ChatView {
        let mut view = ChatView::new(config());
        let _ = view.mount();
        view
    }

    fn ready(user: &str) -> ChatView {
        let mut view = mounted();
        let _ = view.handle(ViewEvent::IdentityChanged(Some(UserId::new(user))));
        view
    }

    fn doc(id: &str, text: &str, seconds: Option<i64>) -> Document {
        let mut fields = BTreeMap::new();
        fields.insert("text".to_string(), Value::from(text));
        fields.insert("userId".to_string(), Value::from("someone"));
        fields.insert(
            "timestamp".to_string(),
            seconds.map_or(Value::Null, |s| Value::from(Timestamp::new(s, 0))),
        );
        Document::new(DocumentId::new(id), fields)
    }

    fn type_text(view: &mut ChatView, text: &str) {
        for c in text.chars() {
            let _ = view.handle(ViewEvent::Key(KeyInput::Char(c)));
        }
    }

    #[test]
    fn unconfigured_backend_fails_on_mount() {
        let mut view = ChatView::new(ChatConfig::new("", None));
        let actions = view.mount();

        assert_eq!(view.state(), &ViewState::Error(ViewError::Configuration));
        assert!(!actions.contains(&ViewAction::WatchIdentity));
        assert_eq!(actions.last(), Some(&ViewAction::Render));
    }

    #[test]
    fn mount_watches_identity_once() {
        let mut view = ChatView::new(config());

        assert_eq!(view.mount(), vec![ViewAction::WatchIdentity, ViewAction::Render]);
        assert!(view.mount().is_empty());
        assert!(view.state().is_loading());
    }

    #[test]
    fn events_before_mount_are_ignored() {
        let mut view = ChatView::new(config());
        let actions = view.handle(ViewEvent::IdentityChanged(Some(UserId::new("u"))));

        assert!(actions.is_empty());
        assert!(view.user().is_none());
    }

    #[test]
    fn missing_identity_requests_sign_in() {
        let mut view = mounted();
        let actions = view.handle(ViewEvent::IdentityChanged(None));

        assert_eq!(actions, vec![ViewAction::SignInAnonymously]);
        assert!(view.state().is_loading());

        // Repeated notification while the attempt is in flight.
        assert!(view.handle(ViewEvent::IdentityChanged(None)).is_empty());
    }

    #[test]
    fn resolved_identity_opens_feed() {
        let mut view = mounted();
        let actions = view.handle(ViewEvent::IdentityChanged(Some(UserId::new("u"))));

        assert!(view.state().is_ready());
        assert!(matches!(actions.as_slice(), [
            ViewAction::OpenFeed { feed: FeedId(0), query },
            ViewAction::Render
        ] if query.path.as_str() == "artifacts/test-app/public/data/messages"
            && query.order_by == "timestamp"));
    }

    #[test]
    fn sign_in_success_then_echo_opens_one_feed() {
        let mut view = mounted();
        let _ = view.handle(ViewEvent::IdentityChanged(None));

        let actions = view.handle(ViewEvent::SignInSucceeded(UserId::new("u")));
        assert!(actions.iter().any(|a| matches!(a, ViewAction::OpenFeed { .. })));

        let echo = view.handle(ViewEvent::IdentityChanged(Some(UserId::new("u"))));
        assert!(echo.is_empty());
        assert_eq!(view.open_feed(), Some(FeedId(0)));
    }

    #[test]
    fn sign_in_failure_is_fatal_and_opens_nothing() {
        let mut view = mounted();
        let _ = view.handle(ViewEvent::IdentityChanged(None));

        let actions = view.handle(ViewEvent::SignInFailed(AuthError::OperationNotAllowed));

        assert!(matches!(view.state(), ViewState::Error(ViewError::Authentication(_))));
        assert!(!view.is_feed_open());
        assert!(!view.is_watching_identity());
        assert!(actions.contains(&ViewAction::ReleaseIdentity));
        assert!(!actions.iter().any(|a| matches!(a, ViewAction::OpenFeed { .. })));
    }

    #[test]
    fn snapshot_replaces_messages_and_scrolls() {
        let mut view = ready("u");

        let first = Snapshot::new(vec![doc("a", "one", Some(1)), doc("b", "two", Some(2))]);
        let actions = view.handle(ViewEvent::FeedSnapshot { feed: FeedId(0), snapshot: first });
        assert_eq!(actions, vec![ViewAction::ScrollToBottom, ViewAction::Render]);
        assert_eq!(view.messages().len(), 2);

        let second = Snapshot::new(vec![doc("c", "three", None)]);
        let _ = view.handle(ViewEvent::FeedSnapshot { feed: FeedId(0), snapshot: second });
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.messages()[0].text, "three");
        assert_eq!(view.messages()[0].timestamp, None);
    }

    #[test]
    fn stale_feed_events_are_dropped() {
        let mut view = ready("u");
        let _ = view.handle(ViewEvent::IdentityChanged(Some(UserId::new("other"))));

        let stale = Snapshot::new(vec![doc("a", "one", Some(1))]);
        assert!(view.handle(ViewEvent::FeedSnapshot { feed: FeedId(0), snapshot: stale }).is_empty());
        assert!(view.messages().is_empty());

        let failed = view
            .handle(ViewEvent::FeedFailed { feed: FeedId(0), error: StoreError::PermissionDenied });
        assert!(failed.is_empty());
        assert!(view.state().is_ready());
    }

    #[test]
    fn feed_failure_is_fatal() {
        let mut view = ready("u");
        let actions = view
            .handle(ViewEvent::FeedFailed { feed: FeedId(0), error: StoreError::PermissionDenied });

        assert_eq!(
            view.state().error().map(ToString::to_string).as_deref(),
            Some("Failed to load messages: missing or insufficient permissions")
        );
        assert!(actions.contains(&ViewAction::CloseFeed { feed: FeedId(0) }));
        assert!(actions.contains(&ViewAction::ReleaseIdentity));
    }

    #[test]
    fn error_state_ignores_everything_but_quit() {
        let mut view = ready("u");
        let _ = view
            .handle(ViewEvent::FeedFailed { feed: FeedId(0), error: StoreError::PermissionDenied });

        assert!(view.handle(ViewEvent::IdentityChanged(Some(UserId::new("x")))).is_empty());
        assert!(view.handle(ViewEvent::Key(KeyInput::Char('a'))).is_empty());
        assert!(view.handle(ViewEvent::Submit).is_empty());
        assert_eq!(view.draft(), "");
        assert_eq!(view.handle(ViewEvent::Key(KeyInput::Esc)), vec![ViewAction::Quit]);
    }

    #[test]
    fn identity_loss_closes_feed_and_signs_in_again() {
        let mut view = ready("u");
        let actions = view.handle(ViewEvent::IdentityChanged(None));

        assert_eq!(actions, vec![
            ViewAction::CloseFeed { feed: FeedId(0) },
            ViewAction::Render,
            ViewAction::SignInAnonymously
        ]);
        assert!(view.state().is_ready());
        assert!(view.user().is_none());
    }

    #[test]
    fn submit_blank_draft_is_noop() {
        let mut view = ready("u");
        type_text(&mut view, "   ");

        assert!(view.handle(ViewEvent::Submit).is_empty());
        assert_eq!(view.draft(), "   ");
    }

    #[test]
    fn submit_requires_ready() {
        let mut view = mounted();
        type_text(&mut view, "hi");

        assert!(view.handle(ViewEvent::Key(KeyInput::Enter)).is_empty());
        assert_eq!(view.sends_in_flight(), 0);

        let _ = view.handle(ViewEvent::IdentityChanged(Some(UserId::new("u"))));
        assert!(view.state().is_ready());
        assert_eq!(view.draft(), "");
    }

    #[test]
    fn loading_view_ignores_composer_and_scroll() {
        let mut view = mounted();

        for event in [
            ViewEvent::Key(KeyInput::Char('x')),
            ViewEvent::Key(KeyInput::Up),
            ViewEvent::Key(KeyInput::Down),
            ViewEvent::DraftChanged("pasted".into()),
            ViewEvent::Submit,
        ] {
            assert!(view.handle(event).is_empty());
        }
        assert_eq!(view.draft(), "");
        assert_eq!(view.handle(ViewEvent::Key(KeyInput::Esc)), vec![ViewAction::Quit]);
    }

    #[test]
    fn successful_send_clears_draft_once() {
        let mut view = ready("u");
        type_text(&mut view, "hello");

        let actions = view.handle(ViewEvent::Submit);
        let [ViewAction::AppendMessage { send, path, message }] = actions.as_slice() else {
            panic!("expected a single append, got {actions:?}");
        };
        assert_eq!(path, &view.collection_path());
        assert_eq!(message.text, "hello");
        assert_eq!(message.user_id, UserId::new("u"));
        assert!(view.messages().is_empty());
        assert_eq!(view.draft(), "hello");

        let send = *send;
        let _ = view.handle(ViewEvent::SendCompleted { send, id: DocumentId::new("d") });
        assert_eq!(view.draft(), "");

        type_text(&mut view, "next");
        assert!(view.handle(ViewEvent::SendCompleted { send, id: DocumentId::new("d") }).is_empty());
        assert_eq!(view.draft(), "next");
    }

    #[test]
    fn failed_send_keeps_draft_and_view() {
        let mut view = ready("u");
        type_text(&mut view, "hello");
        let _ = view.handle(ViewEvent::Submit);

        let actions = view.handle(ViewEvent::SendFailed {
            send: SendId(0),
            error: StoreError::Unavailable("offline".into()),
        });

        assert!(view.state().is_ready());
        assert_eq!(view.draft(), "hello");
        assert_eq!(view.notice(), Some("Failed to send message: store unavailable: offline"));
        assert!(matches!(actions.first(), Some(ViewAction::Log { level: LogLevel::Error, .. })));
    }

    #[test]
    fn arrows_scroll_feed() {
        let mut view = ready("u");

        assert_eq!(view.handle(ViewEvent::Key(KeyInput::Up)), vec![
            ViewAction::Scroll(ScrollDirection::Up),
            ViewAction::Render
        ]);
    }

    #[test]
    fn unmount_releases_everything() {
        let mut view = ready("u");
        let actions = view.handle(ViewEvent::Unmount);

        assert_eq!(actions, vec![
            ViewAction::CloseFeed { feed: FeedId(0) },
            ViewAction::ReleaseIdentity
        ]);
        assert!(!view.is_mounted());
        assert!(view.handle(ViewEvent::Tick).is_empty());
    }
}

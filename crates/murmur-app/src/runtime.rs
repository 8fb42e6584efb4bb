//! Generic runtime for view orchestration.
//!
//! The Runtime drives the view event loop, coordinating between:
//! - [`ChatView`]: view state machine
//! - [`IdentityProvider`] and [`DocumentStore`]: backend collaborators
//! - [`Driver`]: platform-specific input and rendering
//!
//! Collaborator callbacks and completed tasks post [`ViewEvent`]s into one
//! inbox, so the view is only ever touched from the loop.

use murmur_core::{DocumentStore, IdentityProvider, Subscription, WatchEvent};
use tokio::sync::mpsc;

use crate::{ChatView, Driver, FeedId, LogLevel, ViewAction, ViewEvent};

/// Generic runtime that orchestrates the view, the collaborators and the
/// driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `P`: Identity provider
/// - `S`: Document store
pub struct Runtime<D, P, S>
where
    D: Driver,
    P: IdentityProvider,
    S: DocumentStore,
{
    driver: D,
    view: ChatView,
    identity: P,
    store: S,
    inbox_tx: mpsc::UnboundedSender<ViewEvent>,
    inbox: mpsc::UnboundedReceiver<ViewEvent>,
    /// Identity-change listener. `None` if not registered.
    identity_listener: Option<Subscription>,
    /// Open live query and its generation. `None` if closed.
    feed: Option<(FeedId, Subscription)>,
}

impl<D, P, S> Runtime<D, P, S>
where
    D: Driver,
    P: IdentityProvider,
    S: DocumentStore,
{
    /// Create a new runtime around an unmounted view.
    pub fn new(driver: D, view: ChatView, identity: P, store: S) -> Self {
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        Self {
            driver,
            view,
            identity,
            store,
            inbox_tx,
            inbox,
            identity_listener: None,
            feed: None,
        }
    }

    /// Run the main event loop until the view quits.
    ///
    /// Each cycle waits for either driver input or a collaborator
    /// notification, hands it to the view and executes the resulting
    /// actions. On quit the view is unmounted and every listener released.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        let actions = self.view.mount();
        let mut quit = self.execute(actions)?;

        while !quit {
            let event = tokio::select! {
                Some(event) = self.inbox.recv() => Some(event),
                input = self.driver.poll_input() => input?,
            };

            if let Some(event) = event {
                let actions = self.view.handle(event);
                quit = self.execute(actions)?;
            }
        }

        let actions = self.view.handle(ViewEvent::Unmount);
        self.execute(actions)?;
        self.driver.stop();
        Ok(())
    }

    /// Execute actions returned by the view.
    ///
    /// Returns `true` if the view asked to quit.
    fn execute(&mut self, actions: Vec<ViewAction>) -> Result<bool, D::Error> {
        let mut quit = false;

        for action in actions {
            match action {
                ViewAction::Render => self.driver.render(&self.view)?,
                ViewAction::ScrollToBottom => self.driver.scroll_to_bottom(),
                ViewAction::Scroll(direction) => self.driver.scroll(direction),
                ViewAction::WatchIdentity => self.watch_identity(),
                ViewAction::ReleaseIdentity => {
                    self.identity_listener = None;
                },
                ViewAction::SignInAnonymously => self.sign_in(),
                ViewAction::OpenFeed { feed, query } => {
                    let tx = self.inbox_tx.clone();
                    let subscription = self.store.watch(
                        &query,
                        Box::new(move |event| {
                            let event = match event {
                                WatchEvent::Snapshot(snapshot) => {
                                    ViewEvent::FeedSnapshot { feed, snapshot }
                                },
                                WatchEvent::Failed(error) => ViewEvent::FeedFailed { feed, error },
                            };
                            // Receiver gone means the runtime is shutting down.
                            let _ = tx.send(event);
                        }),
                    );
                    self.feed = Some((feed, subscription));
                },
                ViewAction::CloseFeed { feed } => {
                    if self.feed.as_ref().is_some_and(|(open, _)| *open == feed) {
                        self.feed = None;
                    }
                },
                ViewAction::AppendMessage { send, path, message } => {
                    let store = self.store.clone();
                    let tx = self.inbox_tx.clone();
                    tokio::spawn(async move {
                        let event = match store.append(&path, message.into_fields()).await {
                            Ok(id) => ViewEvent::SendCompleted { send, id },
                            Err(error) => ViewEvent::SendFailed { send, error },
                        };
                        let _ = tx.send(event);
                    });
                },
                ViewAction::Log { level, message } => match level {
                    LogLevel::Debug => tracing::debug!("{message}"),
                    LogLevel::Info => tracing::info!("{message}"),
                    LogLevel::Warn => tracing::warn!("{message}"),
                    LogLevel::Error => tracing::error!("{message}"),
                },
                ViewAction::Quit => quit = true,
            }
        }

        Ok(quit)
    }

    fn watch_identity(&mut self) {
        let tx = self.inbox_tx.clone();
        let subscription = self.identity.subscribe(Box::new(move |user| {
            let _ = tx.send(ViewEvent::IdentityChanged(user));
        }));
        self.identity_listener = Some(subscription);
    }

    fn sign_in(&self) {
        let identity = self.identity.clone();
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let event = match identity.sign_in_anonymously().await {
                Ok(user) => ViewEvent::SignInSucceeded(user),
                Err(error) => ViewEvent::SignInFailed(error),
            };
            let _ = tx.send(event);
        });
    }

    /// Identity-change listener is registered.
    pub fn is_watching_identity(&self) -> bool {
        self.identity_listener.is_some()
    }

    /// Generation of the open live query. `None` if closed.
    pub fn open_feed(&self) -> Option<FeedId> {
        self.feed.as_ref().map(|(feed, _)| *feed)
    }

    /// Get a reference to the view
    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// Get a mutable reference to the view
    pub fn view_mut(&mut self) -> &mut ChatView {
        &mut self.view
    }

    /// Get a reference to the driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`murmur_app::Runtime`] orchestration code runs in both production and
//! simulation. Input is paced with `tokio::time`, so tests run on a paused
//! clock.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use murmur_app::{ChatView, Driver, KeyInput, ScrollDirection, ViewEvent, ViewState};
use murmur_core::Message;

use crate::invariants::{InvariantRegistry, Phase, ViewSnapshot};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// What the view looked like on one render.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    /// View state.
    pub state: ViewState,
    /// Mirrored messages.
    pub messages: Vec<Message>,
    /// Draft text.
    pub draft: String,
    /// Notice line.
    pub notice: Option<String>,
}

/// Shared state for input injection and inspection.
///
/// Clones of the driver share it, so a test can keep one handle while the
/// runtime owns the other.
#[derive(Default)]
struct SharedState {
    pending: VecDeque<ViewEvent>,
    frames: Vec<RenderedFrame>,
    history: Vec<Phase>,
    scrolled_to_bottom: usize,
    scrolls: Vec<ScrollDirection>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
    pace: Duration,
    quit_when_idle: bool,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a driver that quits once its input runs out.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            invariants: None,
            pace: Duration::from_millis(10),
            quit_when_idle: true,
        }
    }

    /// Create a driver preloaded with `script`.
    pub fn scripted(script: impl IntoIterator<Item = ViewEvent>) -> Self {
        let driver = Self::new();
        driver.lock().pending.extend(script);
        driver
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Keep ticking instead of quitting when input runs out.
    #[must_use]
    pub fn keep_running(mut self) -> Self {
        self.quit_when_idle = false;
        self
    }

    /// Inject a `ViewEvent` as the next input.
    pub fn inject_event(&self, event: ViewEvent) {
        self.lock().pending.push_back(event);
    }

    /// Inject typed text, one key per character.
    pub fn inject_text(&self, text: &str) {
        self.lock().pending.extend(text.chars().map(|c| ViewEvent::Key(KeyInput::Char(c))));
    }

    /// Check if there is input left to deliver.
    pub fn has_pending(&self) -> bool {
        !self.lock().pending.is_empty()
    }

    /// Every frame rendered so far.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.lock().frames.clone()
    }

    /// Last frame rendered. `None` if nothing was rendered.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.lock().frames.last().cloned()
    }

    /// Number of scroll-to-bottom requests.
    pub fn scrolled_to_bottom(&self) -> usize {
        self.lock().scrolled_to_bottom
    }

    /// Manual scroll requests, in order.
    pub fn scrolls(&self) -> Vec<ScrollDirection> {
        self.lock().scrolls.clone()
    }

    /// `stop` was called.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    #[allow(clippy::expect_used)]
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().expect("SimDriver state mutex poisoned")
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_input(&mut self) -> Result<Option<ViewEvent>, Self::Error> {
        tokio::time::sleep(self.pace).await;

        let next = self.lock().pending.pop_front();
        Ok(match next {
            Some(event) => Some(event),
            None if self.quit_when_idle => Some(ViewEvent::Key(KeyInput::Esc)),
            None => Some(ViewEvent::Tick),
        })
    }

    fn render(&mut self, view: &ChatView) -> Result<(), Self::Error> {
        let history = {
            let mut state = self.lock();
            let phase = Phase::from(view.state());
            if state.history.last() != Some(&phase) {
                state.history.push(phase);
            }
            state.frames.push(RenderedFrame {
                state: view.state().clone(),
                messages: view.messages().to_vec(),
                draft: view.draft().to_string(),
                notice: view.notice().map(str::to_string),
            });
            state.history.clone()
        };

        if let Some(registry) = &self.invariants {
            let snapshot = ViewSnapshot::from_view(view).with_history(history);
            registry.check_all(&snapshot).map_err(|violations| {
                let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
                SimDriverError(messages.join("; "))
            })?;
        }
        Ok(())
    }

    fn scroll_to_bottom(&mut self) {
        self.lock().scrolled_to_bottom += 1;
    }

    fn scroll(&mut self, direction: ScrollDirection) {
        self.lock().scrolls.push(direction);
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}

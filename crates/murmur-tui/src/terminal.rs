//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    cursor::Show,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use murmur_app::{ChatView, Driver, KeyInput, ScrollDirection, ViewEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{FeedScroll, ui};

/// Interval between [`ViewEvent::Tick`]s when no input arrives.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal event stream ended.
    #[error("terminal input closed")]
    InputClosed,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm) and rendering (ratatui). Owns the feed
/// scroll position, which only exists once content is laid out.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    scroll: FeedScroll,
    restored: bool,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, scroll: FeedScroll::new(), restored: false })
    }

    /// Current feed scroll position.
    pub fn scroll_position(&self) -> FeedScroll {
        self.scroll
    }

    /// Convert a crossterm event into a view event.
    ///
    /// Key releases and repeats, mouse and focus events are dropped.
    pub fn convert_event(event: &Event) -> Option<ViewEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Self::convert_key(key).map(ViewEvent::Key)
            },
            Event::Resize(cols, rows) => Some(ViewEvent::Resize(*cols, *rows)),
            _ => None,
        }
    }

    /// Convert a crossterm key press into `KeyInput`.
    ///
    /// Ctrl+C quits like Esc, since raw mode swallows the signal.
    fn convert_key(key: &KeyEvent) -> Option<KeyInput> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(KeyInput::Esc)
            },
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    /// Leave raw mode and the alternate screen. Idempotent.
    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = stdout().execute(Show);
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_input(&mut self) -> Result<Option<ViewEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(event)) => Ok(Self::convert_event(&event)),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    None => Err(TerminalError::InputClosed),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(TICK_INTERVAL) => Ok(Some(ViewEvent::Tick)),
        }
    }

    fn render(&mut self, view: &ChatView) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, view, &mut self.scroll);
        })?;
        Ok(())
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll.to_bottom();
    }

    fn scroll(&mut self, direction: ScrollDirection) {
        self.scroll.step(direction);
    }

    fn stop(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}

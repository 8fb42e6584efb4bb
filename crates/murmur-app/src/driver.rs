//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the view runtime from a specific frontend.
//! Each frontend implements it to provide input and rendering, while the
//! generic [`crate::Runtime`] handles all orchestration with the
//! collaborators.

use std::future::Future;

use crate::{ChatView, ScrollDirection, ViewEvent};

/// Abstracts frontend I/O for the view runtime.
///
/// Implementations provide platform-specific input and presentation while
/// the generic [`Runtime`](crate::Runtime) handles orchestration. The same
/// orchestration code runs in the terminal client and in tests.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, ratatui for rendering
/// - **Tests**: scripted input, recorded renders
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input event.
    ///
    /// Returns `None` if no input is ready this cycle.
    fn poll_input(&mut self) -> impl Future<Output = Result<Option<ViewEvent>, Self::Error>> + Send;

    /// Render the view.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, view: &ChatView) -> Result<(), Self::Error>;

    /// Scroll the feed container so its last message is in view.
    fn scroll_to_bottom(&mut self);

    /// Scroll the feed container one step.
    fn scroll(&mut self, direction: ScrollDirection);

    /// Release frontend resources.
    fn stop(&mut self);
}

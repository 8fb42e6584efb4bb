//! UI rendering
//!
//! Rendering functions that convert view state into terminal output using
//! ratatui widgets. All functions are pure (no I/O) apart from clamping the
//! feed scroll position to the laid-out content.

mod alert;
mod feed;
mod header;
mod input;
mod loading;
mod status;

pub use feed::{EMPTY_FEED, footer};
pub use input::PLACEHOLDER;

use murmur_app::{ChatView, ViewState};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
};

use crate::FeedScroll;

/// Render the entire UI.
///
/// Loading and error states replace the whole screen.
pub fn render(frame: &mut Frame, view: &ChatView, scroll: &mut FeedScroll) {
    let area = frame.area();

    match view.state() {
        ViewState::Loading => loading::render(frame, area),
        ViewState::Error(error) => alert::render(frame, error, area),
        ViewState::Ready => render_chat(frame, view, scroll, area),
    }
}

/// Render the ready view: header, feed, composer and status line.
fn render_chat(frame: &mut Frame, view: &ChatView, scroll: &mut FeedScroll, area: Rect) {
    const HEADER_HEIGHT: u16 = 4;
    const FEED_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(FEED_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    let [header_area, feed_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    header::render(frame, view, *header_area);
    feed::render(frame, view, scroll, *feed_area);
    input::render(frame, view, *input_area);
    status::render(frame, view, scroll, *status_area);
}

/// Rectangle of at most `width` x `height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(row);
    cell
}

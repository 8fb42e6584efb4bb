//! Loading screen
//!
//! Shown until an identity resolves.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

use super::centered;

const LOADING_TEXT: &str = "Loading application...";

/// Render the loading screen.
pub fn render(frame: &mut Frame, area: Rect) {
    let width = LOADING_TEXT.len() as u16;
    let line = Line::styled(LOADING_TEXT, Style::default().fg(Color::DarkGray)).centered();

    frame.render_widget(Paragraph::new(line), centered(area, width, 1));
}

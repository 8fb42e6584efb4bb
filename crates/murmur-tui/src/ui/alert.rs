//! Error alert
//!
//! A fatal error replaces the whole view. Only quitting is possible from
//! here.

use murmur_core::ViewError;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::centered;

const ALERT_TITLE: &str = " An error occurred ";
const QUIT_HINT: &str = "Press Esc to quit";
const ALERT_MAX_WIDTH: u16 = 64;
const ALERT_HEIGHT: u16 = 7;

/// Render the error alert.
pub fn render(frame: &mut Frame, error: &ViewError, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            ALERT_TITLE,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::raw(error.to_string()),
        Line::raw(""),
        Line::styled(QUIT_HINT, Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    let width = area.width.min(ALERT_MAX_WIDTH);

    frame.render_widget(paragraph, centered(area, width, ALERT_HEIGHT));
}

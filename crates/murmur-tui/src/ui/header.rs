//! Header
//!
//! Title and the session's user identifier.

use murmur_app::ChatView;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const TITLE: &str = " Murmur ";
const SUBTITLE: &str = "A realtime chat room.";
const USER_ID_LABEL: &str = "Your user ID: ";

/// Render the header.
pub fn render(frame: &mut Frame, view: &ChatView, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(
        Line::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)).centered(),
    );

    let user_id = view.user().map_or("", |user| user.as_str());
    let lines = vec![
        Line::styled(SUBTITLE, Style::default().fg(Color::DarkGray)).centered(),
        Line::from(vec![
            Span::raw(USER_ID_LABEL),
            Span::styled(user_id, Style::default().add_modifier(Modifier::BOLD)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

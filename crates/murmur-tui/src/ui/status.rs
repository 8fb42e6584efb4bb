//! Status bar
//!
//! Displays the last send failure, or the room and key hints.

use std::fmt::Write as _;

use murmur_app::ChatView;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::FeedScroll;

const KEY_HINTS: &str = " | Enter send | Up/Down scroll | Esc quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &ChatView, scroll: &FeedScroll, area: Rect) {
    let status_line = match view.notice() {
        Some(notice) => Line::from(vec![
            Span::raw(" "),
            Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ]),
        None => {
            let room = Span::styled(
                format!("#{}", view.config().deployment_id),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            );

            let count = view.messages().len();
            let mut info = format!(" | Messages: {count}");
            if view.sends_in_flight() > 0 {
                info.push_str(" | Sending...");
            }
            if !scroll.is_at_bottom() {
                let _ = write!(info, " | Scrolled up {}", scroll.offset());
            }
            info.push_str(KEY_HINTS);

            Line::from(vec![Span::raw(" "), room, Span::raw(info)])
        },
    };

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

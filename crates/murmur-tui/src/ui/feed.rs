//! Message feed
//!
//! Displays the mirrored messages in store order. Own messages are
//! right-aligned, everyone else's left-aligned, each followed by an
//! author/time footer.

use murmur_app::ChatView;
use murmur_core::Message;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use crate::FeedScroll;

/// Shown in place of the feed when there are no messages.
pub const EMPTY_FEED: &str = "No messages yet. Be the first!";

/// Footer time while the server timestamp is pending.
const PENDING_TIME: &str = "...";

/// Messages take at most this share of the feed width.
const BUBBLE_WIDTH_PERCENT: usize = 75;

/// Author and time line shown under a message.
///
/// `abcdefgh... - 14:05`, or `abcdefgh... - ...` until the server time is
/// known.
pub fn footer(message: &Message) -> String {
    let time = message.timestamp.map_or_else(|| PENDING_TIME.to_string(), |t| t.to_string());
    format!("{}... - {time}", message.short_author())
}

/// Render the feed.
pub fn render(frame: &mut Frame, view: &ChatView, scroll: &mut FeedScroll, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Messages ");
    let inner = block.inner(area);

    if view.messages().is_empty() {
        scroll.to_bottom();
        let empty = Line::styled(EMPTY_FEED, Style::default().fg(Color::DarkGray)).centered();
        frame.render_widget(Paragraph::new(empty).block(block), area);
        return;
    }

    let lines = feed_lines(view, inner.width);
    let top = scroll.window(lines.len(), usize::from(inner.height));
    let top = u16::try_from(top).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((top, 0)), area);
}

/// Lay out every message as wrapped text lines plus a footer, separated by
/// blank lines.
fn feed_lines(view: &ChatView, width: u16) -> Vec<Line<'static>> {
    let bubble_width = (usize::from(width) * BUBBLE_WIDTH_PERCENT / 100).max(1);
    let mut lines = Vec::new();

    for (i, message) in view.messages().iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }

        let own = view.user().is_some_and(|user| message.is_from(user));
        let text_style = if own {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let footer_style = Style::default().fg(Color::DarkGray);

        let mut bubble: Vec<Line<'static>> = wrap(&message.text, bubble_width)
            .into_iter()
            .map(|chunk| Line::styled(chunk, text_style))
            .collect();
        bubble.push(Line::styled(footer(message), footer_style));

        lines.extend(bubble.into_iter().map(|line| {
            if own { line.right_aligned() } else { line.left_aligned() }
        }));
    }

    lines
}

/// Split `text` into chunks at most `width` display columns wide. A character
/// wider than `width` gets a chunk of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut columns = 0;

    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if columns + w > width && !chunk.is_empty() {
            chunks.push(std::mem::take(&mut chunk));
            columns = 0;
        }
        chunk.push(c);
        columns += w;
    }

    chunks.push(chunk);
    chunks
}

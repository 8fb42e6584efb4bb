//! Composer line
//!
//! Displays the draft with cursor, or a placeholder when it is empty.

use murmur_app::ChatView;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shown in place of an empty draft.
pub const PLACEHOLDER: &str = "Type a message...";

const PROMPT: &str = "> ";
const PROMPT_WIDTH: u16 = 3; // border + "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the composer line.
pub fn render(frame: &mut Frame, view: &ChatView, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let available_width = usize::from(area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING));

    let draft = view.draft();
    let skip = hidden_prefix(draft, view.cursor(), available_width);

    let content = if draft.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(draft.chars().skip(skip).collect::<String>(), Style::default().fg(Color::White))
    };

    let line = Line::from(vec![Span::raw(PROMPT), content]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    let before_cursor: String = draft.chars().take(view.cursor()).skip(skip).collect();
    let cursor_offset = u16::try_from(before_cursor.width()).unwrap_or(u16::MAX);
    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}

/// Characters dropped off the left edge so the cursor column stays within
/// `available` display columns.
fn hidden_prefix(draft: &str, cursor: usize, available: usize) -> usize {
    let mut columns: usize = draft.chars().take(cursor).filter_map(UnicodeWidthChar::width).sum();
    let mut skip = 0;

    for c in draft.chars().take(cursor) {
        if columns <= available {
            break;
        }
        columns -= c.width().unwrap_or(0);
        skip += 1;
    }
    skip
}

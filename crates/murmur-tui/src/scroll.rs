//! Feed scroll position.
//!
//! The view only asks for "scroll to bottom" or one step up or down. How far
//! that is depends on the rendered content, so the position is kept here as
//! an offset from the bottom and clamped whenever the feed is drawn.

use murmur_app::ScrollDirection;

/// Lines moved per scroll step.
const SCROLL_STEP: usize = 1;

/// Scroll position of the feed, in lines above the bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedScroll {
    offset: usize,
}

impl FeedScroll {
    /// Pinned to the bottom.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines between the last visible line and the end of the feed.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Last line of the feed is in view.
    pub fn is_at_bottom(&self) -> bool {
        self.offset == 0
    }

    /// Bring the last line into view.
    pub fn to_bottom(&mut self) {
        self.offset = 0;
    }

    /// Move one step towards older or newer lines.
    pub fn step(&mut self, direction: ScrollDirection) {
        self.offset = match direction {
            ScrollDirection::Up => self.offset.saturating_add(SCROLL_STEP),
            ScrollDirection::Down => self.offset.saturating_sub(SCROLL_STEP),
        };
    }

    /// First visible line for `content` lines shown in `visible` rows.
    ///
    /// Clamps the offset so scrolling past the top stops at the first line.
    pub fn window(&mut self, content: usize, visible: usize) -> usize {
        let max_offset = content.saturating_sub(visible);
        self.offset = self.offset.min(max_offset);
        max_offset - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_bottom() {
        let mut scroll = FeedScroll::new();
        assert!(scroll.is_at_bottom());
        assert_eq!(scroll.window(30, 10), 20);
    }

    #[test]
    fn steps_clamp_at_both_ends() {
        let mut scroll = FeedScroll::new();
        scroll.step(ScrollDirection::Down);
        assert_eq!(scroll.offset(), 0);

        for _ in 0..50 {
            scroll.step(ScrollDirection::Up);
        }
        assert_eq!(scroll.window(30, 10), 0);
        assert_eq!(scroll.offset(), 20);

        scroll.step(ScrollDirection::Down);
        assert_eq!(scroll.window(30, 10), 1);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut scroll = FeedScroll::new();
        scroll.step(ScrollDirection::Up);
        assert_eq!(scroll.window(4, 10), 0);
        assert!(scroll.is_at_bottom());
    }

    #[test]
    fn to_bottom_resets_offset() {
        let mut scroll = FeedScroll::new();
        scroll.step(ScrollDirection::Up);
        scroll.step(ScrollDirection::Up);
        scroll.to_bottom();
        assert!(scroll.is_at_bottom());
    }
}

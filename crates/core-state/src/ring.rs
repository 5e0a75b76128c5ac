use std::ops::Range;
use tracing::trace;

/// Capacity of the line history.
pub const BUF_SIZE: usize = 1024;

/// Bounded history of slave-window lines.
///
/// Full means reset, not evict: recording into a full ring clears it first, so the
/// new line becomes the only entry.
#[derive(Debug, Clone)]
pub struct TextRing {
    lines: Vec<String>,
    capacity: usize,
}

impl Default for TextRing {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRing {
    pub fn new() -> Self {
        Self::with_capacity(BUF_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a line. Returns true when the ring had to be cleared to make room.
    pub fn record(&mut self, text: impl Into<String>) -> bool {
        let reset = self.lines.len() >= self.capacity;
        if reset {
            trace!(target: "state.ring", capacity = self.capacity, "ring_reset");
            self.lines.clear();
        }
        self.lines.push(text.into());
        reset
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Visible sub-range of the ring plus the focused row.
///
/// While `following` the window is recomputed against the ring on every `settle`, pinning it
/// to the newest `max_lines` entries. Any explicit scroll stops following until the next
/// `follow_tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollWindow {
    max_lines: usize,
    first: usize,
    last: usize,
    following: bool,
    sel_line: Option<usize>,
}

impl ScrollWindow {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines,
            first: 0,
            last: 0,
            following: true,
            sel_line: None,
        }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn first_line_vis(&self) -> usize {
        self.first
    }

    pub fn last_line_vis(&self) -> usize {
        self.last
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Re-anchor to the newest content on the next settle.
    pub fn follow_tail(&mut self) {
        self.following = true;
    }

    /// Resolve the tail anchor against the current line count.
    pub fn settle(&mut self, tcnt: usize) {
        if self.following {
            self.first = tcnt.saturating_sub(self.max_lines);
            self.last = tcnt;
        }
    }

    /// Ring indices shown in the window, clamped to what the ring holds.
    pub fn visible(&self, tcnt: usize) -> Range<usize> {
        let end = self.last.min(tcnt).min(self.first + self.max_lines);
        self.first.min(end)..end
    }

    /// Ring index drawn on visible row `row`, if that row has content.
    pub fn line_at_row(&self, row: usize, tcnt: usize) -> Option<usize> {
        let index = self.first + row;
        (row < self.max_lines && self.visible(tcnt).contains(&index)).then_some(index)
    }

    /// Move by `n` lines (negative is up). Returns false when nothing can scroll because every
    /// line already fits.
    pub fn scroll_by(&mut self, n: isize, tcnt: usize) -> bool {
        if tcnt <= self.max_lines {
            return false;
        }
        self.settle(tcnt);
        self.following = false;
        if self.first as isize + n < 0 {
            self.first = 0;
            self.last = self.max_lines;
        } else if self.last as isize + n > tcnt as isize {
            self.first = tcnt - self.max_lines;
            self.last = tcnt;
        } else {
            self.first = self.first.saturating_add_signed(n);
            self.last = self.last.saturating_add_signed(n);
        }
        trace!(target: "state.scroll", n, first = self.first, last = self.last, "scroll_by");
        true
    }

    pub fn scroll_home(&mut self) {
        self.following = false;
        self.first = 0;
        self.last = self.max_lines;
    }

    pub fn scroll_end(&mut self, tcnt: usize) {
        self.following = false;
        self.first = tcnt.saturating_sub(self.max_lines);
        self.last = tcnt;
    }

    /// Focus a visible row (or clear focus).
    pub fn select(&mut self, row: Option<usize>) {
        self.sel_line = row;
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.sel_line
    }

    /// Consume the focused row, returning its ring index. Focus on a row past the end of the
    /// ring is left untouched and yields nothing.
    pub fn take_selection(&mut self, tcnt: usize) -> Option<usize> {
        let row = self.sel_line?;
        let index = self.first + row;
        if index >= tcnt {
            return None;
        }
        self.sel_line = None;
        Some(index)
    }
}

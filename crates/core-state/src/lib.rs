//! Bar state: line history, scroll window, window flags and the run flag.
//!
//! Everything here is plain data mutated by the action dispatcher and read by the
//! renderer, both on the event-loop task. Nothing in this crate talks to a surface;
//! the host compares flags before and after a dispatch and applies the difference.
//!
//! Design invariants:
//! * `last_line_vis - first_line_vis <= max_lines` at all times.
//! * A slave window with zero lines is inert: collapse/stick/scroll guards all check
//!   `SlaveWindow::has_lines` before acting.
//! * `RunState::exit_code` is only meaningful once `running` is false.

pub mod ring;

pub use ring::{BUF_SIZE, ScrollWindow, TextRing};

/// Horizontal placement of rendered content inside a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    /// Parse `l`/`c`/`r` or the full word; anything else is `fallback`.
    pub fn parse_or(s: &str, fallback: Align) -> Align {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Align::Left,
            "c" | "center" | "centre" => Align::Center,
            "r" | "right" => Align::Right,
            _ => fallback,
        }
    }
}

/// Title auto-resize mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandMode {
    /// Grow leftwards; the right edge stays put.
    Left,
    /// Grow rightwards; the left edge stays put.
    Right,
}

impl ExpandMode {
    pub fn parse(s: &str) -> Option<ExpandMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Some(ExpandMode::Left),
            "r" | "right" => Some(ExpandMode::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleWindow {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub align: Align,
    pub expand: Option<ExpandMode>,
    pub hidden: bool,
}

impl Default for TitleWindow {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            align: Align::Center,
            expand: None,
            hidden: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlaveWindow {
    pub width: u32,
    pub align: Align,
    /// Rows act as menu entries (selection + menu actions).
    pub menu: bool,
    /// Menu laid out horizontally; collapse and stick do not apply.
    pub horizontal: bool,
    pub sticky: bool,
    /// Keep running after input ends.
    pub persistent: bool,
    pub mapped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub running: bool,
    pub exit_code: i32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            running: true,
            exit_code: 0,
        }
    }
}

impl RunState {
    pub fn request_exit(&mut self, code: i32) {
        self.running = false;
        self.exit_code = code;
    }
}

/// Input grabs requested by actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grabs {
    pub keys: bool,
    pub mouse: bool,
}

/// Aggregate owned by the event loop.
#[derive(Debug, Clone)]
pub struct BarState {
    pub title: TitleWindow,
    pub slave: SlaveWindow,
    pub ring: TextRing,
    pub scroll: ScrollWindow,
    pub run: RunState,
    pub grabs: Grabs,
    /// Visible slave rows must be repainted.
    pub body_dirty: bool,
}

impl BarState {
    pub fn new(title: TitleWindow, slave: SlaveWindow, max_lines: usize) -> Self {
        Self {
            title,
            slave,
            ring: TextRing::new(),
            scroll: ScrollWindow::new(max_lines),
            run: RunState::default(),
            grabs: Grabs::default(),
            body_dirty: false,
        }
    }

    pub fn max_lines(&self) -> usize {
        self.scroll.max_lines()
    }

    pub fn has_lines(&self) -> bool {
        self.scroll.max_lines() > 0
    }

    /// Store an input line and re-anchor the window to it.
    pub fn record_line(&mut self, text: impl Into<String>) {
        self.ring.record(text);
        self.scroll.follow_tail();
        self.scroll.settle(self.ring.len());
        self.body_dirty = true;
    }

    /// Empty the ring and blank the visible rows.
    pub fn clear_lines(&mut self) {
        self.ring.clear();
        self.scroll.follow_tail();
        self.scroll.settle(0);
        self.scroll.select(None);
        self.body_dirty = true;
    }

    /// Scroll and mark the body for repaint when anything moved.
    pub fn scroll_by(&mut self, n: isize) -> bool {
        let moved = self.has_lines() && self.scroll.scroll_by(n, self.ring.len());
        self.body_dirty |= moved;
        moved
    }

    pub fn scroll_home(&mut self) {
        if self.has_lines() {
            self.scroll.scroll_home();
            self.body_dirty = true;
        }
    }

    pub fn scroll_end(&mut self) {
        if self.has_lines() {
            self.scroll.scroll_end(self.ring.len());
            self.body_dirty = true;
        }
    }

    /// Ring index of the menu selection, consumed. None outside menu mode.
    pub fn take_menu_selection(&mut self) -> Option<usize> {
        if !self.slave.menu {
            return None;
        }
        self.scroll.take_selection(self.ring.len())
    }

    /// Raw text shown on visible row `row`.
    pub fn row_text(&self, row: usize) -> Option<&str> {
        self.scroll
            .line_at_row(row, self.ring.len())
            .and_then(|i| self.ring.get(i))
    }
}

//! `Canvas` on a terminal: a shadow cell screen plus row-level flushing.
//!
//! Design invariants:
//! * Slot writes land in the shadow screen only; `flush` emits the touched rows once, in
//!   row order, so a frame never shows half-drawn lines.
//! * Every write is clipped to its slot; nothing spills into neighbouring slots.
//! * Emission goes to the writer given at construction (stderr in the binary) so stdout
//!   stays free for action output.

use anyhow::Result;
use core_render::{Canvas, Color, FontMetrics, Slot, Theme};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::Write;
use tracing::trace;

use crate::capabilities::TerminalCapabilities;
use crate::grid::{self, Cell, CellGrid};
use crate::scratch::GridScratch;

/// Screen placement of the title and slave slots, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotLayout {
    pub title_x: i32,
    pub title_y: i32,
    pub title_width: i32,
    pub slave_x: i32,
    pub slave_width: i32,
    pub line_height: u16,
    pub lines: usize,
    pub horizontal: bool,
}

impl SlotLayout {
    fn lh(&self) -> i32 {
        i32::from(self.line_height.max(1))
    }

    /// Top-left corner and width of `slot`, or `None` for a row past `lines`.
    pub fn slot_rect(&self, slot: Slot) -> Option<(i32, i32, i32)> {
        match slot {
            Slot::Title => Some((self.title_x, self.title_y, self.title_width)),
            Slot::Line(row) if row < self.lines => {
                let row = row as i32;
                if self.horizontal {
                    let cell = self.slave_width / self.lines as i32;
                    Some((self.slave_x + row * cell, self.title_y + self.lh(), cell))
                } else {
                    Some((self.slave_x, self.title_y + self.lh() * (row + 1), self.slave_width))
                }
            }
            Slot::Line(_) => None,
        }
    }
}

pub struct TerminalCanvas<W: Write> {
    out: W,
    screen: CellGrid,
    dirty: Vec<bool>,
    layout: SlotLayout,
    theme: Theme,
    caps: TerminalCapabilities,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(
        out: W,
        columns: u16,
        rows: u16,
        layout: SlotLayout,
        theme: Theme,
        caps: TerminalCapabilities,
    ) -> Self {
        Self {
            out,
            screen: CellGrid::new(columns, rows),
            dirty: vec![true; usize::from(rows)],
            layout,
            theme,
            caps,
        }
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    pub fn screen(&self) -> &CellGrid {
        &self.screen
    }

    /// Replace the slot layout; the whole screen is blanked and repainted on next flush.
    pub fn set_layout(&mut self, layout: SlotLayout) {
        self.layout = layout;
        self.screen = CellGrid::new(self.screen.width, self.screen.height);
        self.dirty.fill(true);
    }

    /// Adopt a new terminal size. Contents are discarded; callers redraw afterwards.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.screen = CellGrid::new(columns, rows);
        self.dirty = vec![true; usize::from(rows)];
    }

    fn mark(&mut self, y: i32) {
        if let Some(d) = usize::try_from(y).ok().and_then(|y| self.dirty.get_mut(y)) {
            *d = true;
        }
    }

    fn fill_area(&mut self, x: i32, y: i32, width: i32, cell: &Cell) {
        let cols = x.max(0)..x.saturating_add(width).min(i32::from(self.screen.width));
        for row in y..y.saturating_add(self.layout.lh()) {
            for col in cols.clone() {
                self.screen.set(col, row, cell.clone());
            }
            self.mark(row);
        }
    }

    /// Emit every touched row and flush the writer.
    pub fn flush(&mut self) -> Result<()> {
        let mut emitted = 0usize;
        for y in 0..self.screen.height {
            if !std::mem::take(&mut self.dirty[usize::from(y)]) {
                continue;
            }
            queue!(self.out, MoveTo(0, y), ResetColor)?;
            // Colors last sent on this row; `None` until the first cell.
            let mut fg: Option<Option<Color>> = None;
            let mut bg: Option<Option<Color>> = None;
            for x in 0..self.screen.width {
                let Some(cell) = self.screen.get(i32::from(x), i32::from(y)) else {
                    continue;
                };
                if !cell.is_leader() {
                    continue;
                }
                if fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(self.caps.term_color(cell.fg)))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    queue!(self.out, SetBackgroundColor(self.caps.term_color(cell.bg)))?;
                    bg = Some(cell.bg);
                }
                queue!(self.out, Print(&cell.cluster))?;
            }
            emitted += 1;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        trace!(target: "render.terminal", rows = emitted, "flush");
        Ok(())
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    type Scratch = GridScratch;

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: 1,
            descent: 0,
            line_height: self.layout.lh(),
        }
    }

    fn text_width(&self, text: &str) -> i32 {
        grid::text_width(text)
    }

    fn create_scratch(&mut self, width: i32, height: i32) -> GridScratch {
        GridScratch::new(width, height, self.theme.fg, self.theme.bg)
    }

    fn fill_slot(&mut self, slot: Slot, color: Color) {
        if let Some((x, y, w)) = self.layout.slot_rect(slot) {
            self.fill_area(x, y, w, &Cell::blank(Some(color)));
        }
    }

    fn present(&mut self, scratch: GridScratch, slot: Slot, dest_x: i32) {
        let Some((x, y, width)) = self.layout.slot_rect(slot) else {
            return;
        };
        let src = &scratch.grid;
        for row in 0..i32::from(src.height).min(self.layout.lh()) {
            for sx in 0..i32::from(src.width) {
                let col = dest_x.saturating_add(sx);
                if col < 0 || col >= width {
                    continue;
                }
                let Some(cell) = src.get(sx, row) else {
                    continue;
                };
                // A continuation whose leader was clipped away becomes a blank.
                let cell = if !cell.is_leader() && (col == 0 || sx == 0) {
                    Cell::blank(cell.bg)
                } else {
                    cell.clone()
                };
                self.screen.set(x.saturating_add(col), y + row, cell);
            }
            self.mark(y + row);
        }
    }

    fn resize_title(&mut self, x: i32, width: i32) {
        let old = self.layout;
        if old.title_x == x && old.title_width == width {
            return;
        }
        self.fill_area(old.title_x, old.title_y, old.title_width, &Cell::default());
        self.layout.title_x = x;
        self.layout.title_width = width;
        trace!(target: "render.terminal", x, width, "title_resized");
    }

    fn hide_slot(&mut self, slot: Slot) {
        if let Some((x, y, w)) = self.layout.slot_rect(slot) {
            self.fill_area(x, y, w, &Cell::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_render::{LineRenderer, LineTarget};
    use core_state::Align;
    use pretty_assertions::assert_eq;

    fn layout() -> SlotLayout {
        SlotLayout {
            title_x: 0,
            title_y: 0,
            title_width: 10,
            slave_x: 0,
            slave_width: 10,
            line_height: 1,
            lines: 2,
            horizontal: false,
        }
    }

    fn canvas() -> TerminalCanvas<Vec<u8>> {
        TerminalCanvas::new(
            Vec::new(),
            12,
            4,
            layout(),
            Theme::default(),
            TerminalCapabilities::from_colorterm(""),
        )
    }

    fn draw(c: &mut TerminalCanvas<Vec<u8>>, slot: Slot, line: &str, align: Align) {
        let width = c.layout().slot_rect(slot).map_or(0, |(_, _, w)| w);
        LineRenderer::default().render(c, line, LineTarget::new(slot, width, align));
    }

    #[test]
    fn slot_rects() {
        let l = layout();
        assert_eq!(l.slot_rect(Slot::Title), Some((0, 0, 10)));
        assert_eq!(l.slot_rect(Slot::Line(1)), Some((0, 2, 10)));
        assert_eq!(l.slot_rect(Slot::Line(2)), None);
        let h = SlotLayout {
            horizontal: true,
            ..l
        };
        assert_eq!(h.slot_rect(Slot::Line(1)), Some((5, 1, 5)));
    }

    #[test]
    fn title_text_lands_on_title_row() {
        let mut c = canvas();
        draw(&mut c, Slot::Title, "hi ^fg(red)there", Align::Left);
        assert_eq!(c.screen().row_text(0), "hi there    ");
        let red = Color::rgb(255, 0, 0);
        assert_eq!(c.screen().get(3, 0).unwrap().fg, Some(red));
        assert_eq!(c.screen().get(0, 0).unwrap().fg, Some(Theme::default().fg));
    }

    #[test]
    fn centered_text_and_slot_clipping() {
        let mut c = canvas();
        draw(&mut c, Slot::Line(0), "abcd", Align::Center);
        assert_eq!(c.screen().row_text(1), "   abcd     ");
        // Nothing outside the 10 column slot was touched.
        assert_eq!(c.screen().get(10, 1).unwrap().bg, None);
    }

    #[test]
    fn hide_and_title_resize_blank_old_area() {
        let mut c = canvas();
        draw(&mut c, Slot::Title, "title", Align::Left);
        c.resize_title(4, 5);
        assert_eq!(c.screen().get(0, 0).unwrap().bg, None);
        assert_eq!(c.layout().slot_rect(Slot::Title), Some((4, 0, 5)));

        draw(&mut c, Slot::Line(1), "x", Align::Left);
        c.hide_slot(Slot::Line(1));
        assert_eq!(c.screen().row_text(2).trim(), "");
    }

    #[test]
    fn flush_emits_text_and_clears_dirty() {
        let mut c = canvas();
        draw(&mut c, Slot::Title, "bar", Align::Left);
        c.flush().unwrap();
        let out = String::from_utf8(std::mem::take(&mut c.out)).unwrap();
        assert!(out.contains("bar"));
        c.flush().unwrap();
        let out = String::from_utf8(std::mem::take(&mut c.out)).unwrap();
        assert!(!out.contains("bar"), "clean rows are not re-emitted");
    }

    #[test]
    fn resize_marks_everything_dirty() {
        let mut c = canvas();
        c.flush().unwrap();
        c.resize(20, 2);
        assert_eq!(c.screen().width, 20);
        assert!(c.dirty.iter().all(|d| *d));
    }
}

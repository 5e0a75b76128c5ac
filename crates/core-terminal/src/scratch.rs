//! Cell-based line scratch.
//!
//! One surface unit is one terminal cell. Filled shapes paint cell backgrounds with the
//! foreground color; outlines and arcs use box and circle glyphs.

use core_render::{Color, Icon, IconPixels, Scratch};

use crate::grid::{Cell, CellGrid};

const FULL_SWEEP: i32 = 360;

#[derive(Debug, Clone)]
pub struct GridScratch {
    pub grid: CellGrid,
    fg: Color,
    bg: Color,
}

impl GridScratch {
    pub fn new(width: i32, height: i32, fg: Color, bg: Color) -> Self {
        let clamp = |v: i32| v.clamp(0, i32::from(u16::MAX)) as u16;
        Self {
            grid: CellGrid::new(clamp(width), clamp(height)),
            fg,
            bg,
        }
    }

    fn paint(&mut self, x: i32, y: i32) {
        self.grid.set(x, y, Cell::blank(Some(self.fg)));
    }

    /// Columns `from..to` that exist on the grid.
    fn cols(&self, from: i32, to: i32) -> std::ops::Range<i32> {
        from.max(0)..to.min(i32::from(self.grid.width))
    }

    /// Rows `from..to` that exist on the grid.
    fn rows(&self, from: i32, to: i32) -> std::ops::Range<i32> {
        from.max(0)..to.min(i32::from(self.grid.height))
    }

    fn glyph(&mut self, x: i32, y: i32, glyph: &str) {
        let bg = self.grid.get(x, y).and_then(|c| c.bg);
        self.grid.set(x, y, Cell::leader(glyph, 1, Some(self.fg), bg));
    }

    // Cells of the (x, y, w, h) box whose centers fall inside the ellipse and the sweep.
    fn arc_cells(&self, x: i32, y: i32, w: i32, h: i32, start: i32, sweep: i32) -> Vec<(i32, i32, bool)> {
        let mut out = Vec::new();
        if w <= 0 || h <= 0 {
            return out;
        }
        let (rx, ry) = (f64::from(w) / 2.0, f64::from(h) / 2.0);
        let (cx, cy) = (f64::from(x) + rx, f64::from(y) + ry);
        for row in self.rows(y, y.saturating_add(h)) {
            for col in self.cols(x, x.saturating_add(w)) {
                let dx = (f64::from(col) + 0.5 - cx) / rx;
                let dy = (f64::from(row) + 0.5 - cy) / ry;
                let d = dx.hypot(dy);
                if d > 1.0 || !within_sweep(dx, dy, start, sweep) {
                    continue;
                }
                // Edge cells: within one cell of the boundary on the narrower axis.
                let edge = d > 1.0 - 1.0 / rx.min(ry).max(1.0);
                out.push((col, row, edge));
            }
        }
        out
    }
}

// Angles counter-clockwise from 3 o'clock; screen y grows downward.
fn within_sweep(dx: f64, dy: f64, start: i32, sweep: i32) -> bool {
    if sweep.abs() >= FULL_SWEEP {
        return true;
    }
    let angle = (-dy).atan2(dx).to_degrees();
    let delta = if sweep >= 0 {
        (angle - f64::from(start)).rem_euclid(360.0)
    } else {
        (f64::from(start) - angle).rem_euclid(360.0)
    };
    delta <= f64::from(sweep.abs())
}

impl Scratch for GridScratch {
    fn set_foreground(&mut self, color: Color) {
        self.fg = color;
    }

    fn set_background(&mut self, color: Color) {
        self.bg = color;
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        for row in self.rows(y, y.saturating_add(h)) {
            for col in self.cols(x, x.saturating_add(w)) {
                self.paint(col, row);
            }
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        if w < 0 {
            return;
        }
        let (right, bottom) = (x.saturating_add(w), y.saturating_add(h.max(0)));
        let inner = self.cols(x.saturating_add(1), right);
        if bottom == y {
            // One row tall: bracket the span.
            self.glyph(x, y, "[");
            for col in inner {
                self.glyph(col, y, "─");
            }
            if right > x {
                self.glyph(right, y, "]");
            }
            return;
        }
        for col in inner {
            self.glyph(col, y, "─");
            self.glyph(col, bottom, "─");
        }
        for row in self.rows(y.saturating_add(1), bottom) {
            self.glyph(x, row, "│");
            self.glyph(right, row, "│");
        }
        self.glyph(x, y, "┌");
        self.glyph(right, y, "┐");
        self.glyph(x, bottom, "└");
        self.glyph(right, bottom, "┘");
    }

    fn fill_arc(&mut self, x: i32, y: i32, w: i32, h: i32, start: i32, sweep: i32) {
        for (col, row, _) in self.arc_cells(x, y, w, h, start, sweep) {
            self.paint(col, row);
        }
    }

    fn draw_arc(&mut self, x: i32, y: i32, w: i32, h: i32, start: i32, sweep: i32) {
        let cells = self.arc_cells(x, y, w, h, start, sweep);
        // Shapes thinner than the grid have no interior; outline every covered cell.
        let thin = !cells.iter().any(|(_, _, edge)| !edge);
        for (col, row, edge) in cells {
            if edge || thin {
                self.glyph(col, row, "○");
            }
        }
    }

    fn draw_text(&mut self, x: i32, baseline: i32, text: &str) {
        // Cell fonts are one row tall with the baseline at the row's bottom.
        self.grid.put_text(x, baseline.saturating_sub(1), text, Some(self.fg));
    }

    fn draw_icon(&mut self, x: i32, y: i32, icon: &Icon) {
        let grid_h = i64::from(self.grid.height);
        let grid_w = i64::from(self.grid.width);
        let (x, y) = (i64::from(x), i64::from(y));
        let rows = (grid_h - y).min(i64::from(icon.height));
        if rows <= 0 || icon.height == 0 {
            return;
        }
        let height = u64::from(icon.height);
        let width = u64::from(icon.width);
        let rows = rows as u64;
        let first_row = (-y).max(0) as u64;
        // Only pixel columns that land on the grid are projected.
        let first_px = (-x).max(0) as u64;
        let last_px = (grid_w - x).clamp(0, i64::from(icon.width)) as u64;
        // Project each pixel column onto `rows` cells, sampling the band of icon rows
        // that lands on each cell.
        for px in first_px..last_px {
            for r in first_row..rows {
                let from = r * height / rows;
                let to = ((r + 1) * height / rows).max(from + 1);
                let color = match &icon.pixels {
                    IconPixels::Bitmap(bits) => {
                        let set = (from..to)
                            .any(|iy| bits.get((iy * width + px) as usize) == Some(&true));
                        Some(if set { self.fg } else { self.bg })
                    }
                    IconPixels::Pixmap(_) => (from..to)
                        .find_map(|iy| icon.pixel(px as u32, iy as u32, self.fg, self.bg)),
                };
                if let Some(color) = color {
                    let (col, row) = ((x + px as i64) as i32, (y + r as i64) as i32);
                    self.grid.set(col, row, Cell::blank(Some(color)));
                }
            }
        }
    }
}

//! Cell grid backing both line scratches and the shadow screen.
//!
//! A `Cell` stores the full grapheme cluster for leader cells along with its visual width;
//! continuation cells (width 0) occupy the remaining columns of a wide cluster and never
//! print text.
//!
//! Invariants:
//! - Leader: width >= 1, `cluster` non-empty.
//! - Continuation: width == 0, `cluster` empty, immediately right of its leader.
//! - Colors of `None` mean the terminal default (unpainted / hidden area).

use core_render::Color;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub cluster: String,
    pub width: u8,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    #[inline]
    pub fn leader(cluster: &str, width: u16, fg: Option<Color>, bg: Option<Color>) -> Self {
        Self {
            cluster: cluster.to_string(),
            width: width.clamp(1, 2) as u8,
            fg,
            bg,
        }
    }

    #[inline]
    pub fn continuation(fg: Option<Color>, bg: Option<Color>) -> Self {
        Self {
            cluster: String::new(),
            width: 0,
            fg,
            bg,
        }
    }

    /// Blank cell painted with `bg`.
    #[inline]
    pub fn blank(bg: Option<Color>) -> Self {
        Self::leader(" ", 1, None, bg)
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank(None)
    }
}

/// Display width of one grapheme cluster in terminal columns (at least 1).
pub fn cluster_width(cluster: &str) -> u16 {
    UnicodeWidthStr::width(cluster).clamp(1, 2) as u16
}

/// Display width of a string, summed per grapheme cluster.
pub fn text_width(text: &str) -> i32 {
    text.graphemes(true)
        .map(|g| i32::from(cluster_width(g)))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        (x >= 0 && y >= 0 && x < w && y < h).then(|| y as usize * w as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Replace one cell; out-of-range writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// Write `text` from column `x` on row `y`, keeping each cell's background. Returns the
    /// column after the last cluster. A wide cluster that would straddle the right edge is
    /// dropped.
    pub fn put_text(&mut self, x: i32, y: i32, text: &str, fg: Option<Color>) -> i32 {
        let mut col = x;
        for g in text.graphemes(true) {
            let w = cluster_width(g);
            if col.saturating_add(i32::from(w)) > i32::from(self.width) {
                break;
            }
            if col >= 0 {
                let bg = self.get(col, y).and_then(|c| c.bg);
                self.set(col, y, Cell::leader(g, w, fg, bg));
                for k in 1..i32::from(w) {
                    let bg = self.get(col + k, y).and_then(|c| c.bg);
                    self.set(col + k, y, Cell::continuation(fg, bg));
                }
            }
            col = col.saturating_add(i32::from(w));
        }
        col
    }

    /// Printable text of row `y` (leaders only).
    pub fn row_text(&self, y: u16) -> String {
        let w = usize::from(self.width);
        let start = usize::from(y) * w;
        self.cells
            .get(start..start + w)
            .map(|row| {
                row.iter()
                    .filter(|c| c.is_leader())
                    .map(|c| c.cluster.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn widths_follow_clusters() {
        assert_eq!(text_width("abc"), 3);
        assert_eq!(text_width("漢字"), 4);
        assert_eq!(text_width("e\u{0301}"), 1);
        assert_eq!(text_width(""), 0);
    }

    #[test]
    fn put_text_writes_leaders_and_continuations() {
        let mut g = CellGrid::new(6, 1);
        let end = g.put_text(1, 0, "a漢", None);
        assert_eq!(end, 4);
        assert_eq!(g.get(2, 0).unwrap().cluster, "漢");
        assert_eq!(g.get(3, 0).unwrap().width, 0);
        assert_eq!(g.row_text(0), " a漢  ");
    }

    #[test]
    fn put_text_keeps_background_and_clips() {
        let red = Color::rgb(255, 0, 0);
        let mut g = CellGrid::new(3, 1);
        g.set(0, 0, Cell::blank(Some(red)));
        g.put_text(0, 0, "xy漢", None);
        assert_eq!(g.get(0, 0).unwrap().bg, Some(red));
        assert_eq!(g.row_text(0), "xy ");
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut g = CellGrid::new(2, 1);
        g.set(-1, 0, Cell::blank(None));
        g.set(5, 0, Cell::blank(None));
        assert_eq!(g.put_text(-1, 0, "abc", None), 2);
        assert_eq!(g.row_text(0), "bc");
        assert_eq!(g.row_text(3), "");
    }
}

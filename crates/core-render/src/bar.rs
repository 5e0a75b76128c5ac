//! Title + slave composition on top of `LineRenderer`.
//!
//! Design invariants:
//! * Every visible slave row is repainted on a body render; rows without content are drawn
//!   from an empty line so stale text never survives a scroll or a clear.
//! * A collapsed (unmapped) slave hides its rows instead of drawing them.
//! * In menu mode the selected row is drawn reversed.

use core_state::{BarState, TitleWindow};
use tracing::trace;

use crate::color::Theme;
use crate::line::{LineRenderer, LineTarget, TitleExpand};
use crate::surface::{Canvas, Slot};

#[derive(Debug, Clone, Copy, Default)]
pub struct BarRenderer {
    line: LineRenderer,
}

impl BarRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            line: LineRenderer::new(theme),
        }
    }

    pub fn theme(&self) -> Theme {
        self.line.theme
    }

    /// Draw `text` into the title slot. Returns the content width (0 when hidden).
    pub fn render_title<C: Canvas>(&self, canvas: &mut C, title: &TitleWindow, text: &str) -> i32 {
        if title.hidden {
            canvas.hide_slot(Slot::Title);
            return 0;
        }
        let width = title.width as i32;
        let expand = title.expand.map(|mode| TitleExpand {
            mode,
            x: title.x,
            right_corner: title.x + width,
        });
        let target = LineTarget::new(Slot::Title, width, title.align).expanding(expand);
        self.line.render(canvas, text, target)
    }

    /// Draw visible slave row `row`, reversed when `reverse`.
    pub fn render_row<C: Canvas>(&self, canvas: &mut C, state: &BarState, row: usize, reverse: bool) {
        let text = state.row_text(row).unwrap_or("");
        let target = LineTarget::new(Slot::Line(row), row_width(state), state.slave.align)
            .reversed(reverse);
        self.line.render(canvas, text, target);
    }

    /// Repaint all visible slave rows and clear the dirty flag.
    pub fn render_body<C: Canvas>(&self, canvas: &mut C, state: &mut BarState) {
        if !state.has_lines() {
            state.body_dirty = false;
            return;
        }
        state.scroll.settle(state.ring.len());
        let rows = state.max_lines();
        if !state.slave.mapped {
            for row in 0..rows {
                canvas.hide_slot(Slot::Line(row));
            }
        } else {
            let highlight = if state.slave.menu {
                state.scroll.selected_row()
            } else {
                None
            };
            for row in 0..rows {
                self.render_row(canvas, state, row, highlight == Some(row));
            }
        }
        trace!(
            target: "render.bar",
            rows,
            mapped = state.slave.mapped,
            first = state.scroll.first_line_vis(),
            "body_rendered"
        );
        state.body_dirty = false;
    }
}

/// Width of one slave slot: the full slave width, or an equal share of it when the menu is
/// laid out horizontally.
pub fn row_width(state: &BarState) -> i32 {
    let width = state.slave.width as i32;
    if state.slave.horizontal && state.max_lines() > 0 {
        width / state.max_lines() as i32
    } else {
        width
    }
}

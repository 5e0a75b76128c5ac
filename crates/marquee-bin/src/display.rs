//! The event loop's view of the drawing surface.
//!
//! `Display` extends `Canvas` with the operations only the runtime needs: adopting a new
//! terminal size, reporting where the slots ended up (title moves after an expand), and
//! pushing a finished frame out.

use anyhow::Result;
use core_config::Geometry;
use core_input::PointerLayout;
use core_render::Canvas;
use core_terminal::{SlotLayout, TerminalCanvas};
use std::io::Write;

pub trait Display: Canvas {
    /// Adopt a new screen size and slot placement. Contents are discarded.
    fn relayout(&mut self, columns: u16, rows: u16, layout: SlotLayout);
    /// Current slot placement, including any title resize made while rendering.
    fn slot_layout(&self) -> SlotLayout;
    /// Make everything drawn since the last commit visible.
    fn commit(&mut self) -> Result<()>;
}

impl<W: Write> Display for TerminalCanvas<W> {
    fn relayout(&mut self, columns: u16, rows: u16, layout: SlotLayout) {
        self.resize(columns, rows);
        self.set_layout(layout);
    }

    fn slot_layout(&self) -> SlotLayout {
        self.layout()
    }

    fn commit(&mut self) -> Result<()> {
        self.flush()
    }
}

/// Slot placement for resolved geometry. The slave band starts at the title's x.
pub fn slot_layout(geometry: &Geometry, horizontal: bool) -> SlotLayout {
    SlotLayout {
        title_x: geometry.x,
        title_y: geometry.y,
        title_width: geometry.title_width as i32,
        slave_x: geometry.x,
        slave_width: geometry.slave_width as i32,
        line_height: geometry.line_height,
        lines: geometry.lines,
        horizontal,
    }
}

fn cells(v: i32) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

/// Hit-test layout published to the input task.
pub fn pointer_layout(layout: &SlotLayout, slave_mapped: bool) -> PointerLayout {
    PointerLayout {
        title_x: cells(layout.title_x),
        title_y: cells(layout.title_y),
        title_width: cells(layout.title_width),
        slave_x: cells(layout.slave_x),
        slave_width: cells(layout.slave_width),
        line_height: layout.line_height,
        lines: u16::try_from(layout.lines).unwrap_or(u16::MAX),
        slave_mapped,
        horizontal: layout.horizontal,
    }
}

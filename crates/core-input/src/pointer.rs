//! Pointer hit-testing against the on-screen bar layout.

use core_events::Target;
use crossterm::event::MouseButton;

/// Screen placement of the title and slave slots, in terminal cells.
///
/// The title occupies `line_height` rows starting at (`title_x`, `title_y`). Slave slots
/// follow directly below: stacked one per line, or side by side in a single band when the
/// menu is horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerLayout {
    pub title_x: u16,
    pub title_y: u16,
    pub title_width: u16,
    pub slave_x: u16,
    pub slave_width: u16,
    pub line_height: u16,
    pub lines: u16,
    pub slave_mapped: bool,
    pub horizontal: bool,
}

impl PointerLayout {
    /// Region under the cell at (`col`, `row`).
    pub fn target_at(&self, col: u16, row: u16) -> Target {
        let lh = self.line_height.max(1);
        let (col, row) = (u32::from(col), u32::from(row));
        let title_y = u32::from(self.title_y);
        let title_x = u32::from(self.title_x);
        if row >= title_y
            && row < title_y + u32::from(lh)
            && col >= title_x
            && col < title_x + u32::from(self.title_width)
        {
            return Target::Title;
        }
        if !self.slave_mapped || self.lines == 0 || row < title_y + u32::from(lh) {
            return Target::Outside;
        }
        let slave_x = u32::from(self.slave_x);
        if col < slave_x || col >= slave_x + u32::from(self.slave_width) {
            return Target::Outside;
        }
        let band = (row - title_y) / u32::from(lh) - 1;
        let slot = if self.horizontal {
            if band != 0 {
                return Target::Outside;
            }
            let cell = (u32::from(self.slave_width) / u32::from(self.lines)).max(1);
            (col - slave_x) / cell
        } else {
            band
        };
        if slot < u32::from(self.lines) {
            Target::Slave(slot as usize)
        } else {
            Target::Outside
        }
    }
}

/// X11-style button number: left/middle/right are 1-3.
pub(crate) fn button_number(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
    }
}

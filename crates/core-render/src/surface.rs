//! Drawing surface seams.
//!
//! `Canvas` is the long-lived display side (fonts, colors, icon lookup, the visible
//! slots). `Scratch` is a per-line off-screen buffer: the renderer draws one line into a
//! fresh scratch, then hands it back to the canvas, which copies it onto a slot and
//! drops it. Coordinates are in surface units with the origin at the scratch's top-left.

use std::path::Path;
use tracing::debug;

use crate::color::Color;
use crate::icon::{Icon, load_xbm, load_xpm};

/// Font and line geometry in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub ascent: i32,
    pub descent: i32,
    /// Height of one rendered line; at least the font height.
    pub line_height: i32,
}

impl FontMetrics {
    pub fn font_height(&self) -> i32 {
        self.ascent + self.descent
    }

    /// Text top offset that vertically centers the font inside a line.
    pub fn default_text_y(&self) -> i32 {
        (self.line_height - self.font_height()) / 2 - self.descent
    }
}

/// Destination of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Title,
    /// Visible slave row, 0-based.
    Line(usize),
}

/// Off-screen buffer for one line. Shapes and text use the foreground color; bitmap icons
/// use foreground for set bits and background for clear bits.
pub trait Scratch {
    fn set_foreground(&mut self, color: Color);
    fn set_background(&mut self, color: Color);
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32);
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32);
    /// Angles in degrees, counter-clockwise from 3 o'clock.
    fn fill_arc(&mut self, x: i32, y: i32, w: i32, h: i32, start: i32, sweep: i32);
    fn draw_arc(&mut self, x: i32, y: i32, w: i32, h: i32, start: i32, sweep: i32);
    /// `baseline` is the y of the text baseline.
    fn draw_text(&mut self, x: i32, baseline: i32, text: &str);
    fn draw_icon(&mut self, x: i32, y: i32, icon: &Icon);
}

pub trait Canvas {
    type Scratch: Scratch;

    fn metrics(&self) -> FontMetrics;

    fn text_width(&self, text: &str) -> i32;

    /// Resolve a color name; `None` means "use the theme default".
    fn color(&self, spec: &str) -> Option<Color> {
        match Color::parse(spec) {
            Ok(c) => Some(c),
            Err(err) => {
                debug!(target: "render.line", spec, %err, "color_unresolved");
                None
            }
        }
    }

    fn load_bitmap(&self, path: &str) -> Option<Icon> {
        load_xbm(Path::new(path))
            .inspect_err(|err| debug!(target: "render.line", path, %err, "bitmap_load_failed"))
            .ok()
    }

    fn load_pixmap(&self, path: &str) -> Option<Icon> {
        load_xpm(Path::new(path))
            .inspect_err(|err| debug!(target: "render.line", path, %err, "pixmap_load_failed"))
            .ok()
    }

    fn create_scratch(&mut self, width: i32, height: i32) -> Self::Scratch;

    /// Paint a whole slot with one color (the line background before a copy).
    fn fill_slot(&mut self, slot: Slot, color: Color);

    /// Copy `scratch` onto `slot` starting at `dest_x`, then release it.
    fn present(&mut self, scratch: Self::Scratch, slot: Slot, dest_x: i32);

    /// Move/resize the title to the given horizontal extent.
    fn resize_title(&mut self, _x: i32, _width: i32) {}

    /// Remove a slot from view (collapsed slave, hidden title).
    fn hide_slot(&mut self, _slot: Slot) {}
}

//! In-memory canvas that records draw operations instead of painting them.
//!
//! Used by the renderer tests and by anything that needs to observe layout without a
//! display. Text width is a fixed number of units per character; icons resolve from an
//! in-memory table rather than the filesystem.

use std::collections::HashMap;

use crate::color::Color;
use crate::icon::Icon;
use crate::surface::{Canvas, FontMetrics, Scratch, Slot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    SetForeground(Color),
    SetBackground(Color),
    FillRect { x: i32, y: i32, w: i32, h: i32 },
    DrawRect { x: i32, y: i32, w: i32, h: i32 },
    FillArc { x: i32, y: i32, d: i32, sweep: i32 },
    DrawArc { x: i32, y: i32, d: i32, sweep: i32 },
    Text { x: i32, y: i32, text: String },
    Icon { x: i32, y: i32, width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordingScratch {
    pub width: i32,
    pub height: i32,
    pub ops: Vec<DrawOp>,
}

impl RecordingScratch {
    /// Text drawn into this scratch, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Scratch for RecordingScratch {
    fn set_foreground(&mut self, color: Color) {
        self.ops.push(DrawOp::SetForeground(color));
    }

    fn set_background(&mut self, color: Color) {
        self.ops.push(DrawOp::SetBackground(color));
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.ops.push(DrawOp::FillRect { x, y, w, h });
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.ops.push(DrawOp::DrawRect { x, y, w, h });
    }

    fn fill_arc(&mut self, x: i32, y: i32, w: i32, _h: i32, _start: i32, sweep: i32) {
        self.ops.push(DrawOp::FillArc { x, y, d: w, sweep });
    }

    fn draw_arc(&mut self, x: i32, y: i32, w: i32, _h: i32, _start: i32, sweep: i32) {
        self.ops.push(DrawOp::DrawArc { x, y, d: w, sweep });
    }

    fn draw_text(&mut self, x: i32, baseline: i32, text: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y: baseline,
            text: text.to_string(),
        });
    }

    fn draw_icon(&mut self, x: i32, y: i32, icon: &Icon) {
        self.ops.push(DrawOp::Icon {
            x,
            y,
            width: icon.width,
            height: icon.height,
        });
    }
}

/// One `present` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presented {
    pub slot: Slot,
    pub dest_x: i32,
    pub scratch: RecordingScratch,
}

#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    pub metrics: FontMetrics,
    pub char_width: i32,
    pub presented: Vec<Presented>,
    pub fills: Vec<(Slot, Color)>,
    pub hidden: Vec<Slot>,
    pub title_resizes: Vec<(i32, i32)>,
    bitmaps: HashMap<String, Icon>,
    pixmaps: HashMap<String, Icon>,
}

impl RecordingCanvas {
    pub fn new(metrics: FontMetrics, char_width: i32) -> Self {
        Self {
            metrics,
            char_width,
            presented: Vec::new(),
            fills: Vec::new(),
            hidden: Vec::new(),
            title_resizes: Vec::new(),
            bitmaps: HashMap::new(),
            pixmaps: HashMap::new(),
        }
    }

    /// One unit per character, one unit per line (terminal-like geometry).
    pub fn cells() -> Self {
        Self::new(
            FontMetrics {
                ascent: 1,
                descent: 0,
                line_height: 1,
            },
            1,
        )
    }

    pub fn with_icon(mut self, path: &str, icon: Icon) -> Self {
        if icon.is_bitmap() {
            self.bitmaps.insert(path.to_string(), icon);
        } else {
            self.pixmaps.insert(path.to_string(), icon);
        }
        self
    }

    pub fn last(&self) -> Option<&Presented> {
        self.presented.last()
    }

    /// Most recent presentation to `slot`.
    pub fn last_on(&self, slot: Slot) -> Option<&Presented> {
        self.presented.iter().rev().find(|p| p.slot == slot)
    }
}

impl Canvas for RecordingCanvas {
    type Scratch = RecordingScratch;

    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    fn load_bitmap(&self, path: &str) -> Option<Icon> {
        self.bitmaps.get(path).cloned()
    }

    fn load_pixmap(&self, path: &str) -> Option<Icon> {
        self.pixmaps.get(path).cloned()
    }

    fn create_scratch(&mut self, width: i32, height: i32) -> RecordingScratch {
        RecordingScratch {
            width,
            height,
            ops: Vec::new(),
        }
    }

    fn fill_slot(&mut self, slot: Slot, color: Color) {
        self.fills.push((slot, color));
    }

    fn present(&mut self, scratch: RecordingScratch, slot: Slot, dest_x: i32) {
        self.presented.push(Presented {
            slot,
            dest_x,
            scratch,
        });
    }

    fn resize_title(&mut self, x: i32, width: i32) {
        self.title_resizes.push((x, width));
    }

    fn hide_slot(&mut self, slot: Slot) {
        self.hidden.push(slot);
    }
}

//! Markup rendering for the title and slave lines.
//!
//! A line of markup is lexed by `core-markup` and painted by `LineRenderer` onto an
//! off-screen `Scratch`, which the `Canvas` then copies onto its slot. `BarRenderer`
//! composes the title and the visible slave rows from `BarState`; `route_line` decides
//! which of the two an incoming line belongs to.
//!
//! Design invariants:
//! * Rendering never fails. Unknown colors fall back to the theme, unreadable icons are
//!   skipped, and malformed geometry reads as zero.
//! * Every line starts from the theme colors with the cursor at x = 0.
//! * Content that does not fit is clipped with trailing dots; nothing wraps.
//! * The surface is abstract: a terminal grid, a pixel buffer, or the in-memory
//!   `RecordingCanvas` all implement `Canvas`.
//!
//! Exposed components:
//! * `color`: color names, hex parsing and the default theme.
//! * `icon`: XBM/XPM loading.
//! * `surface`: the `Canvas` / `Scratch` seams and font metrics.
//! * `line`: single-line rendering and run clipping.
//! * `bar`: title and slave composition.
//! * `route`: title / clear / body routing of input lines.
//! * `recording`: draw-op recorder for tests and headless runs.
//! * `timing`: last line render duration.

pub mod bar;
pub mod color;
pub mod icon;
pub mod line;
pub mod recording;
pub mod route;
pub mod surface;
pub mod timing;

pub use bar::{BarRenderer, row_width};
pub use color::{Color, ColorParseError, Theme};
pub use icon::{Icon, IconError, IconPixels, load_xbm, load_xpm, parse_xbm, parse_xpm};
pub use line::{LineRenderer, LineTarget, RunFlags, TitleExpand, clip_run};
pub use recording::{DrawOp, Presented, RecordingCanvas, RecordingScratch};
pub use route::{Route, route_line};
pub use surface::{Canvas, FontMetrics, Scratch, Slot};

/// Text of a markup line with every command removed (the no-draw rendering mode).
pub use core_markup::plain_text;

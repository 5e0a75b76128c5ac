//! Markup line renderer.
//!
//! Walks the lexer output of one line, applying each command to a line-scoped cursor
//! and painting the literal run that follows it. Output goes to a fresh scratch which is
//! copied onto the target slot once at the end.
//!
//! Design invariants:
//! * The cursor (position, colors, flags) starts from the theme for every line.
//! * A command takes effect right before the run that follows it, so a command at end
//!   of line still applies (with an empty run).
//! * Runs that would cross `width - line_height` are clipped and end in up to three dots;
//!   the cursor advances by the clipped width measured before the dots are written.
//! * Failed icon loads and unknown colors degrade silently (debug log only).

use bitflags::bitflags;
use core_markup::{
    Command, CommandKind, Lexer, Piece, leading_int, parse_circle, parse_position, parse_rect,
};
use core_state::{Align, ExpandMode};
use std::time::Instant;
use tracing::{debug, trace};

use crate::color::{Color, Theme};
use crate::surface::{Canvas, FontMetrics, Scratch, Slot};
use crate::timing;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RunFlags: u8 {
        /// Swap foreground and background (menu highlight).
        const REVERSE       = 0b0000_0001;
        /// `^ib(1)`: do not paint backgrounds behind runs and shapes.
        const NO_BACKGROUND = 0b0000_0010;
        /// A position command set y explicitly; shapes use it instead of centering.
        const ABSOLUTE_Y    = 0b0000_0100;
    }
}

/// Title auto-resize parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleExpand {
    pub mode: ExpandMode,
    /// Configured left edge of the title.
    pub x: i32,
    /// Right edge the title grows away from in `Left` mode.
    pub right_corner: i32,
}

/// Where and how one line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTarget {
    pub slot: Slot,
    /// Slot width in surface units.
    pub width: i32,
    pub align: Align,
    pub reverse: bool,
    /// Only honored for the title slot.
    pub expand: Option<TitleExpand>,
}

impl LineTarget {
    pub fn new(slot: Slot, width: i32, align: Align) -> Self {
        Self {
            slot,
            width,
            align,
            reverse: false,
            expand: None,
        }
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn expanding(mut self, expand: Option<TitleExpand>) -> Self {
        self.expand = expand;
        self
    }
}

// Line-scoped scan state.
struct ScanCursor {
    px: i32,
    py: i32,
    fg: Color,
    bg: Color,
    flags: RunFlags,
}

impl ScanCursor {
    /// Color used for text and shapes.
    fn ink(&self) -> Color {
        if self.flags.contains(RunFlags::REVERSE) { self.bg } else { self.fg }
    }

    /// Color used behind text and shapes.
    fn paper(&self) -> Color {
        if self.flags.contains(RunFlags::REVERSE) { self.fg } else { self.bg }
    }
}

/// Draw state shared by all commands of one line.
struct LinePainter<'a, C: Canvas> {
    canvas: &'a C,
    scratch: C::Scratch,
    theme: Theme,
    metrics: FontMetrics,
    width: i32,
    cur: ScanCursor,
}

impl<C: Canvas> LinePainter<'_, C> {
    // Paint the background of a `w` wide column at the cursor and select the ink.
    fn paint_background(&mut self, x: i32, w: i32) {
        if !self.cur.flags.contains(RunFlags::NO_BACKGROUND) {
            self.scratch.set_foreground(self.cur.paper());
            self.scratch.fill_rect(x, 0, w, self.metrics.line_height);
            self.scratch.set_background(self.cur.paper());
        }
        self.scratch.set_foreground(self.cur.ink());
    }

    fn resolve(&self, payload: &str, fallback: Color) -> Color {
        if payload.is_empty() {
            return fallback;
        }
        self.canvas.color(payload).unwrap_or(fallback)
    }

    fn reset_y(&mut self) {
        self.cur.flags.remove(RunFlags::ABSOLUTE_Y);
        self.cur.py = self.metrics.default_text_y();
    }

    fn apply(&mut self, cmd: &Command) {
        let lh = self.metrics.line_height;
        let payload = cmd.payload.as_str();
        match cmd.kind {
            CommandKind::Background => self.cur.bg = self.resolve(payload, self.theme.bg),
            CommandKind::Foreground => {
                self.cur.fg = self.resolve(payload, self.theme.fg);
                self.scratch.set_foreground(self.cur.ink());
            }
            CommandKind::IgnoreBackground => {
                self.cur
                    .flags
                    .set(RunFlags::NO_BACKGROUND, leading_int(payload) != 0);
            }
            CommandKind::Icon => self.icon(payload),
            CommandKind::Rect => {
                let r = parse_rect(payload);
                let h = r.height.min(lh);
                let y = if r.y == 0 { lh.saturating_sub(h) / 2 } else { r.y };
                self.cur.px = self.cur.px.saturating_add(r.x);
                self.paint_background(self.cur.px, r.width);
                let y = self.shape_y(y);
                self.scratch.fill_rect(self.cur.px, y, r.width, h);
                self.cur.px = self.cur.px.saturating_add(r.width);
            }
            CommandKind::RectOutline => {
                let r = parse_rect(payload);
                if r.width == 0 {
                    return;
                }
                let h = if r.height > lh {
                    lh.saturating_sub(2)
                } else {
                    r.height.saturating_sub(1)
                };
                let spare = lh.saturating_sub(h);
                let mut y = if r.y == 0 { spare / 2 } else { r.y };
                self.cur.px = self.cur.px.saturating_add(r.x);
                // Even leftover space would round the outline one row low.
                if spare % 2 == 0 {
                    y = y.saturating_sub(1);
                }
                self.paint_background(self.cur.px, r.width);
                let y = self.shape_y(y);
                self.scratch.draw_rect(self.cur.px, y, r.width.saturating_sub(1), h);
                self.cur.px = self.cur.px.saturating_add(r.width);
            }
            CommandKind::Circle | CommandKind::CircleOutline => {
                let c = parse_circle(payload);
                let d = c.diameter;
                self.paint_background(self.cur.px, d);
                let y = if self.cur.flags.contains(RunFlags::ABSOLUTE_Y) {
                    self.cur.py
                } else {
                    lh.saturating_sub(d) / 2
                };
                if cmd.kind == CommandKind::Circle {
                    self.scratch.fill_arc(self.cur.px, y, d, d, 90, c.sweep());
                } else {
                    self.scratch.draw_arc(self.cur.px, y, d, d, 90, c.sweep());
                }
                self.cur.px = self.cur.px.saturating_add(d);
            }
            CommandKind::Position | CommandKind::AbsPosition => {
                if payload.is_empty() {
                    self.reset_y();
                    return;
                }
                let p = parse_position(payload);
                let absolute = cmd.kind == CommandKind::AbsPosition;
                if let Some(x) = p.x {
                    self.cur.px = if absolute {
                        x.saturating_abs()
                    } else {
                        self.cur.px.saturating_add(x).max(0)
                    };
                }
                if let Some(y) = p.y {
                    self.cur.py = if absolute { y } else { self.cur.py.saturating_add(y) };
                }
                // Only a y-only payload pins shapes to the cursor row.
                self.cur
                    .flags
                    .set(RunFlags::ABSOLUTE_Y, p.x.is_none() && p.y.is_some());
            }
            CommandKind::TitleWindow | CommandKind::SensitiveArea => {
                trace!(target: "render.line", kind = ?cmd.kind, "command_ignored");
            }
        }
    }

    // Explicit y beats centering; negative y counts up from the bottom.
    fn shape_y(&self, y: i32) -> i32 {
        if self.cur.flags.contains(RunFlags::ABSOLUTE_Y) {
            self.cur.py
        } else if y < 0 {
            self.metrics.line_height.saturating_add(y)
        } else {
            y
        }
    }

    fn icon(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        let Some(icon) = self
            .canvas
            .load_bitmap(path)
            .or_else(|| self.canvas.load_pixmap(path))
        else {
            debug!(target: "render.line", path, "icon_unavailable");
            return;
        };
        let w = i32::try_from(icon.width).unwrap_or(i32::MAX);
        let h = i32::try_from(icon.height).unwrap_or(i32::MAX);
        if (self.metrics.font_height() / 2)
            .saturating_add(self.cur.px)
            .saturating_add(w)
            >= self.width
        {
            debug!(target: "render.line", path, px = self.cur.px, "icon_overflow");
            return;
        }
        self.paint_background(self.cur.px, w);
        let lh = self.metrics.line_height;
        let y = if lh >= h { (lh - h) / 2 } else { 0 };
        self.scratch.draw_icon(self.cur.px, y, &icon);
        self.cur.px = self.cur.px.saturating_add(w);
    }

    fn run(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        let limit = self.width.saturating_sub(self.metrics.line_height);
        let (text, tw) = clip_run(text, self.cur.px, limit, |s| self.canvas.text_width(s));
        if text.is_empty() {
            return;
        }
        self.paint_background(self.cur.px, tw);
        self.scratch
            .draw_text(self.cur.px, self.cur.py.saturating_add(self.metrics.ascent), &text);
        self.cur.px = self.cur.px.saturating_add(tw);
    }
}

/// Drop trailing characters until `px + width <= limit`, then mark the cut with up to three
/// dots. Returns the clipped text and its width before the dots were written.
pub fn clip_run(
    mut text: String,
    px: i32,
    limit: i32,
    measure: impl Fn(&str) -> i32,
) -> (String, i32) {
    let mut tw = measure(&text);
    let mut dropped = false;
    while tw.saturating_add(px) > limit && text.pop().is_some() {
        dropped = true;
        tw = measure(&text);
    }
    if dropped {
        let kept = text.chars().count();
        let dots = kept.saturating_sub(1).min(3);
        let keep = kept - dots;
        text = text.chars().take(keep).chain(std::iter::repeat_n('.', dots)).collect();
    }
    (text, tw)
}

/// Renders markup lines against a `Canvas`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRenderer {
    pub theme: Theme,
}

impl LineRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Draw `line` into `target`. Returns the rendered content width.
    pub fn render<C: Canvas>(&self, canvas: &mut C, line: &str, target: LineTarget) -> i32 {
        let started = Instant::now();
        let metrics = canvas.metrics();
        let reverse = if target.reverse {
            RunFlags::REVERSE
        } else {
            RunFlags::empty()
        };
        let cur = ScanCursor {
            px: 0,
            py: metrics.default_text_y(),
            fg: self.theme.fg,
            bg: self.theme.bg,
            flags: reverse,
        };
        let scratch = canvas.create_scratch(target.width, metrics.line_height);
        let mut painter = LinePainter {
            canvas: &*canvas,
            scratch,
            theme: self.theme,
            metrics,
            width: target.width,
            cur,
        };
        painter.scratch.set_foreground(painter.cur.paper());
        painter
            .scratch
            .fill_rect(0, 0, target.width, metrics.line_height);
        painter.scratch.set_foreground(painter.cur.ink());

        let mut pending: Option<Command> = None;
        for piece in Lexer::new(line) {
            match piece {
                Piece::Command(cmd) => pending = Some(cmd),
                Piece::Run(text) => {
                    if let Some(cmd) = pending.take() {
                        painter.apply(&cmd);
                    }
                    painter.run(text);
                }
            }
        }
        let LinePainter { scratch, cur, .. } = painter;
        let content = cur.px;
        let paper = if target.reverse { self.theme.fg } else { self.theme.bg };

        let dest_x = match (target.slot, target.expand) {
            (Slot::Title, Some(expand)) => {
                let x = match expand.mode {
                    ExpandMode::Left => expand.right_corner.saturating_sub(content).max(expand.x),
                    ExpandMode::Right => expand.x,
                };
                canvas.resize_title(x, content);
                0
            }
            _ => match target.align {
                Align::Left => 0,
                Align::Center => target.width.saturating_sub(content) / 2,
                Align::Right => target.width.saturating_sub(content),
            },
        };
        canvas.fill_slot(target.slot, paper);
        canvas.present(scratch, target.slot, dest_x);
        timing::record_line_render(started);
        trace!(target: "render.line", slot = ?target.slot, content, dest_x, "line_rendered");
        content
    }

    /// Plain-text projection of `line` (no drawing).
    pub fn plain_text(&self, line: &str) -> String {
        core_markup::plain_text(line)
    }
}

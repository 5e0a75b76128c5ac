//! Configuration loading and geometry resolution.
//!
//! Parses `marquee.toml` (or an override path provided by the binary) into `ConfigFile`.
//! Every field is optional; a missing file or one that fails to parse yields defaults.
//! Command-line flags are layered on top via `Config::apply_overrides`, and the final
//! on-screen geometry is resolved against the terminal size by `Config::apply_context`:
//!
//! * width `0` means "full terminal width" for the title and "same as the title" for
//!   the slave,
//! * negative `x`/`y` count from the right/bottom edge,
//! * slave lines are clamped so the title plus every slave row fit on screen.
//!
//! The raw parsed values are retained so a resize can re-resolve them. Unknown fields are
//! ignored (TOML deserialization tolerance).

use anyhow::Result;
use core_state::{Align, ExpandMode};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, info};

const FILE_NAME: &str = "marquee.toml";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct TitleConfig {
    #[serde(default)]
    pub align: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub expand: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct SlaveConfig {
    #[serde(default)]
    pub lines: usize,
    #[serde(default)]
    pub align: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub menu: bool,
    #[serde(default)]
    pub horizontal: bool,
    #[serde(default)]
    pub persistent: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    #[serde(default)]
    pub fg: Option<String>,
    #[serde(default)]
    pub bg: Option<String>,
    #[serde(default = "StyleConfig::default_line_height")]
    pub line_height: u16,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fg: None,
            bg: None,
            line_height: Self::default_line_height(),
        }
    }
}

impl StyleConfig {
    const fn default_line_height() -> u16 {
        1
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct EventsConfig {
    /// Event/action specification layered over the built-in defaults.
    #[serde(default)]
    pub actions: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub title: TitleConfig,
    #[serde(default)]
    pub slave: SlaveConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// Command-line values that replace file values when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub title_align: Option<String>,
    pub slave_align: Option<String>,
    pub width: Option<u32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub lines: Option<usize>,
    pub expand: Option<String>,
    pub menu: bool,
    pub horizontal: bool,
    pub persistent: bool,
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub line_height: Option<u16>,
    pub actions: Option<String>,
}

/// Terminal facts geometry is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub columns: u16,
    pub rows: u16,
}

impl ConfigContext {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }
}

/// Resolved on-screen placement in surface units (terminal cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub title_width: u32,
    pub slave_width: u32,
    pub lines: usize,
    pub line_height: u16,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data, overrides applied
    pub effective: Geometry, // resolved against the last context
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("marquee").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_file_absent");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                effective: Geometry::default(),
            })
        }
        Err(err) => {
            info!(target: "config", path = %path.display(), %err, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn title_align(&self) -> Align {
        parse_align(self.file.title.align.as_deref(), Align::Center)
    }

    pub fn slave_align(&self) -> Align {
        parse_align(self.file.slave.align.as_deref(), Align::Left)
    }

    pub fn expand(&self) -> Option<ExpandMode> {
        self.file.title.expand.as_deref().and_then(ExpandMode::parse)
    }

    pub fn actions(&self) -> Option<&str> {
        self.file.events.actions.as_deref()
    }

    /// Layer command-line values over the file values.
    pub fn apply_overrides(&mut self, o: Overrides) {
        let f = &mut self.file;
        if o.title_align.is_some() {
            f.title.align = o.title_align;
        }
        if o.slave_align.is_some() {
            f.slave.align = o.slave_align;
        }
        if o.expand.is_some() {
            f.title.expand = o.expand;
        }
        if let Some(width) = o.width {
            f.title.width = width;
        }
        if let Some(x) = o.x {
            f.title.x = x;
        }
        if let Some(y) = o.y {
            f.title.y = y;
        }
        if let Some(lines) = o.lines {
            f.slave.lines = lines;
        }
        f.slave.menu |= o.menu;
        f.slave.horizontal |= o.horizontal;
        f.slave.persistent |= o.persistent;
        if o.fg.is_some() {
            f.style.fg = o.fg;
        }
        if o.bg.is_some() {
            f.style.bg = o.bg;
        }
        if let Some(lh) = o.line_height {
            f.style.line_height = lh;
        }
        if o.actions.is_some() {
            f.events.actions = o.actions;
        }
    }

    /// Resolve placement against the terminal size. Returns the effective geometry.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> Geometry {
        let columns = i32::from(ctx.columns);
        let rows = i32::from(ctx.rows);
        let t = &self.file.title;

        let line_height = self.file.style.line_height.max(1);
        if line_height != self.file.style.line_height {
            info!(target: "config", raw = self.file.style.line_height, "line_height_clamped");
        }
        let x = if t.x < 0 { (columns + t.x).max(0) } else { t.x };
        let y = if t.y < 0 { (rows + t.y).max(0) } else { t.y };
        let title_width = match t.width {
            0 => (columns - x).max(0) as u32,
            w => w,
        };
        let slave_width = match self.file.slave.width {
            0 => title_width,
            w => w,
        };

        // Title slot plus `lines` slave slots, each `line_height` rows tall.
        let raw = self.file.slave.lines;
        let slots = ((rows - y).max(0) / i32::from(line_height)) as usize;
        let max = if self.file.slave.horizontal {
            raw
        } else {
            slots.saturating_sub(1)
        };
        let lines = raw.min(max);
        if lines != raw {
            info!(
                target: "config",
                raw,
                clamped = lines,
                max,
                rows = ctx.rows,
                y,
                line_height,
                "slave_lines_clamped"
            );
        }

        self.effective = Geometry {
            x,
            y,
            title_width,
            slave_width,
            lines,
            line_height,
        };
        self.effective
    }

    /// Re-resolve after a resize. Returns `Some(geometry)` when anything changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<Geometry> {
        let prev = self.effective;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }
}

fn parse_align(s: Option<&str>, fallback: Align) -> Align {
    s.map_or(fallback, |s| Align::parse_or(s, fallback))
}

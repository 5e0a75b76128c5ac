//! Terminal capability probing.
//!
//! Detection runs once at startup and only consults the environment: `COLORTERM`
//! advertising `truecolor`/`24bit` enables RGB output, anything else falls back to the
//! xterm 256-color palette.

use core_render::Color;
use crossterm::style::Color as TermColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub truecolor: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        let colorterm = std::env::var("COLORTERM").unwrap_or_default();
        Self::from_colorterm(&colorterm)
    }

    pub fn from_colorterm(colorterm: &str) -> Self {
        let v = colorterm.to_ascii_lowercase();
        Self {
            truecolor: v.contains("truecolor") || v.contains("24bit"),
        }
    }

    /// Terminal color for a cell color; `None` is the terminal default.
    pub fn term_color(&self, color: Option<Color>) -> TermColor {
        match color {
            None => TermColor::Reset,
            Some(c) if self.truecolor => TermColor::Rgb {
                r: c.r,
                g: c.g,
                b: c.b,
            },
            Some(c) => TermColor::AnsiValue(ansi256(c)),
        }
    }
}

fn cube_level(v: u8) -> u8 {
    // xterm cube levels: 0, 95, 135, 175, 215, 255
    if v < 48 {
        0
    } else if v < 115 {
        1
    } else {
        (v - 35) / 40
    }
}

/// Nearest xterm 256-color palette index.
pub fn ansi256(c: Color) -> u8 {
    if c.r == c.g && c.g == c.b {
        return match c.r {
            0..8 => 16,
            249.. => 231,
            v => 232 + ((u16::from(v) - 8) * 24 / 241) as u8,
        };
    }
    16 + 36 * cube_level(c.r) + 6 * cube_level(c.g) + cube_level(c.b)
}

//! Colors and the default theme.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color specification")]
    Empty,
    #[error("malformed hex color `{0}`")]
    BadHex(String),
    #[error("unknown color name `{0}`")]
    UnknownName(String),
}

const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb(0x00, 0x00, 0x00)),
    ("white", Color::rgb(0xff, 0xff, 0xff)),
    ("red", Color::rgb(0xff, 0x00, 0x00)),
    ("green", Color::rgb(0x00, 0xff, 0x00)),
    ("blue", Color::rgb(0x00, 0x00, 0xff)),
    ("yellow", Color::rgb(0xff, 0xff, 0x00)),
    ("cyan", Color::rgb(0x00, 0xff, 0xff)),
    ("magenta", Color::rgb(0xff, 0x00, 0xff)),
    ("orange", Color::rgb(0xff, 0xa5, 0x00)),
    ("purple", Color::rgb(0xa0, 0x20, 0xf0)),
    ("gray", Color::rgb(0xbe, 0xbe, 0xbe)),
    ("grey", Color::rgb(0xbe, 0xbe, 0xbe)),
    ("darkgray", Color::rgb(0xa9, 0xa9, 0xa9)),
    ("darkgrey", Color::rgb(0xa9, 0xa9, 0xa9)),
    ("lightgray", Color::rgb(0xd3, 0xd3, 0xd3)),
    ("lightgrey", Color::rgb(0xd3, 0xd3, 0xd3)),
    ("darkred", Color::rgb(0x8b, 0x00, 0x00)),
    ("darkgreen", Color::rgb(0x00, 0x64, 0x00)),
    ("darkblue", Color::rgb(0x00, 0x00, 0x8b)),
    ("navy", Color::rgb(0x00, 0x00, 0x80)),
    ("steelblue", Color::rgb(0x46, 0x82, 0xb4)),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Accepts `#rgb`, `#rrggbb`, a handful of common names, and `greyNN`/`grayNN`
    /// percentages.
    pub fn parse(spec: &str) -> Result<Color, ColorParseError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = spec.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::BadHex(spec.to_string()));
        }
        let lower = spec.to_ascii_lowercase();
        if let Some((_, c)) = NAMED.iter().find(|(n, _)| *n == lower) {
            return Ok(*c);
        }
        let percent = lower
            .strip_prefix("grey")
            .or_else(|| lower.strip_prefix("gray"))
            .and_then(|p| p.parse::<u16>().ok())
            .filter(|p| *p <= 100);
        match percent {
            Some(p) => {
                let v = ((u32::from(p) * 255 + 50) / 100) as u8;
                Ok(Color::rgb(v, v, v))
            }
            None => Err(ColorParseError::UnknownName(spec.to_string())),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some(Color::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Default foreground/background pair every line starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub fg: Color,
    pub bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::rgb(0xb3, 0xb3, 0xb3),
            bg: Color::rgb(0x11, 0x11, 0x11),
        }
    }
}

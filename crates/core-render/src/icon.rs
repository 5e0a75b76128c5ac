//! XBM bitmap and XPM pixmap decoding.
//!
//! Only the textual C-source forms are supported: X11 `#define`/`_bits[]` bitmaps and
//! XPM3 string arrays. Decoding is strict about dimensions; a short pixel section is
//! `Malformed`, never padded.

use std::path::Path;
use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("icon read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed icon: {0}")]
    Malformed(&'static str),
    #[error("unsupported icon feature: {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconPixels {
    /// Set bits take the foreground color, clear bits the background.
    Bitmap(Vec<bool>),
    /// `None` is transparent.
    Pixmap(Vec<Option<Color>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub width: u32,
    pub height: u32,
    pub pixels: IconPixels,
}

impl Icon {
    pub fn bitmap(width: u32, height: u32, bits: Vec<bool>) -> Self {
        Self {
            width,
            height,
            pixels: IconPixels::Bitmap(bits),
        }
    }

    pub fn pixmap(width: u32, height: u32, pixels: Vec<Option<Color>>) -> Self {
        Self {
            width,
            height,
            pixels: IconPixels::Pixmap(pixels),
        }
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self.pixels, IconPixels::Bitmap(_))
    }

    /// Color at (x, y): `fg`/`bg` for bitmaps, the pixmap entry otherwise.
    pub fn pixel(&self, x: u32, y: u32, fg: Color, bg: Color) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.width as usize + x as usize;
        match &self.pixels {
            IconPixels::Bitmap(bits) => bits.get(i).map(|set| if *set { fg } else { bg }),
            IconPixels::Pixmap(px) => px.get(i).copied().flatten(),
        }
    }
}

pub fn load_xbm(path: &Path) -> Result<Icon, IconError> {
    parse_xbm(&std::fs::read_to_string(path)?)
}

pub fn load_xpm(path: &Path) -> Result<Icon, IconError> {
    parse_xpm(&std::fs::read_to_string(path)?)
}

// -------------------------------------------------------------------------------------------------
// XBM
// -------------------------------------------------------------------------------------------------

fn define_value(src: &str, suffix: &str) -> Option<u32> {
    src.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        (parts.next() == Some("#define")).then_some(())?;
        let name = parts.next()?;
        name.ends_with(suffix).then_some(())?;
        parts.next()?.parse().ok()
    })
}

fn parse_byte(token: &str) -> Option<u8> {
    let t = token.trim();
    match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => t.parse().ok(),
    }
}

pub fn parse_xbm(src: &str) -> Result<Icon, IconError> {
    let width = define_value(src, "_width").ok_or(IconError::Malformed("missing width"))?;
    let height = define_value(src, "_height").ok_or(IconError::Malformed("missing height"))?;
    let open = src.find('{').ok_or(IconError::Malformed("missing bits"))?;
    let close = src[open..]
        .find('}')
        .map(|i| open + i)
        .ok_or(IconError::Malformed("unterminated bits"))?;
    let bytes = src[open + 1..close]
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| parse_byte(t).ok_or(IconError::Malformed("bad byte")))
        .collect::<Result<Vec<u8>, _>>()?;

    let row_bytes = width.div_ceil(8) as usize;
    let needed = row_bytes
        .checked_mul(height as usize)
        .ok_or(IconError::Malformed("dimensions"))?;
    if bytes.len() < needed {
        return Err(IconError::Malformed("short bitmap"));
    }
    // Bounded by the bytes actually present, so this cannot exceed 8 bits per byte.
    let mut bits = Vec::with_capacity(needed.saturating_mul(8));
    for y in 0..height as usize {
        let row = &bytes[y * row_bytes..(y + 1) * row_bytes];
        for x in 0..width as usize {
            bits.push(row[x / 8] & (1 << (x % 8)) != 0);
        }
    }
    Ok(Icon::bitmap(width, height, bits))
}

// -------------------------------------------------------------------------------------------------
// XPM
// -------------------------------------------------------------------------------------------------

fn quoted_strings(src: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = src;
    while let Some(start) = rest.find('"') {
        let body = &rest[start + 1..];
        let Some(end) = body.find('"') else { break };
        out.push(&body[..end]);
        rest = &body[end + 1..];
    }
    out
}

fn color_entry(spec: &str) -> Result<Option<Color>, IconError> {
    // Tokens come in (context, value) pairs; prefer the color context.
    let tokens: Vec<&str> = spec.split_whitespace().collect();
    let value = tokens
        .chunks(2)
        .find(|pair| pair.first() == Some(&"c"))
        .or_else(|| tokens.chunks(2).next())
        .and_then(|pair| pair.get(1))
        .ok_or(IconError::Malformed("color entry"))?;
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Color::parse(value)
        .map(Some)
        .map_err(|err| IconError::Unsupported(err.to_string()))
}

pub fn parse_xpm(src: &str) -> Result<Icon, IconError> {
    let strings = quoted_strings(src);
    let (header, rest) = strings
        .split_first()
        .ok_or(IconError::Malformed("missing header"))?;
    let values: Vec<usize> = header
        .split_whitespace()
        .map(|v| v.parse().map_err(|_| IconError::Malformed("header")))
        .collect::<Result<_, _>>()?;
    let [width, height, ncolors, cpp, ..] = values[..] else {
        return Err(IconError::Malformed("header"));
    };
    if cpp == 0 {
        return Err(IconError::Malformed("zero chars per pixel"));
    }
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(IconError::Malformed("dimensions"));
    };
    let pixel_end = ncolors
        .checked_add(height)
        .ok_or(IconError::Malformed("dimensions"))?;
    if rest.len() < pixel_end {
        return Err(IconError::Malformed("short pixmap"));
    }
    let row_len = width
        .checked_mul(cpp)
        .ok_or(IconError::Malformed("dimensions"))?;
    let rows = &rest[ncolors..pixel_end];
    // Every row must hold `width` keys before anything is sized from the header.
    if rows.iter().any(|row| row.len() < row_len) {
        return Err(IconError::Malformed("short row"));
    }

    let mut palette: Vec<(&str, Option<Color>)> = Vec::with_capacity(ncolors);
    for entry in &rest[..ncolors] {
        let key = entry.get(..cpp).ok_or(IconError::Malformed("color key"))?;
        palette.push((key, color_entry(&entry[cpp..])?));
    }

    let mut pixels = Vec::with_capacity(width.saturating_mul(height));
    for row in rows {
        for x in 0..width {
            let key = row
                .get(x * cpp..(x + 1) * cpp)
                .ok_or(IconError::Malformed("short row"))?;
            let color = palette
                .iter()
                .find(|(k, _)| *k == key)
                .ok_or(IconError::Malformed("unknown pixel key"))?
                .1;
            pixels.push(color);
        }
    }
    Ok(Icon::pixmap(w, h, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ARROW_XBM: &str = "#define arrow_width 10\n#define arrow_height 2\n\
static unsigned char arrow_bits[] = {\n   0x01, 0x02, 0xff, 0x03 };\n";

    const DOT_XPM: &str = r####"/* XPM */
static char * dot_xpm[] = {
"3 2 2 1",
". c None",
"# c #ff0000",
".#.",
"###"};
"####;

    #[test]
    fn xbm_bits_are_lsb_first() {
        let icon = parse_xbm(ARROW_XBM).unwrap();
        assert_eq!((icon.width, icon.height), (10, 2));
        let fg = Color::rgb(1, 1, 1);
        let bg = Color::rgb(0, 0, 0);
        assert_eq!(icon.pixel(0, 0, fg, bg), Some(fg));
        assert_eq!(icon.pixel(1, 0, fg, bg), Some(bg));
        assert_eq!(icon.pixel(9, 0, fg, bg), Some(fg));
        assert_eq!(icon.pixel(8, 0, fg, bg), Some(bg));
        assert_eq!(icon.pixel(9, 1, fg, bg), Some(fg));
        assert_eq!(icon.pixel(10, 0, fg, bg), None);
    }

    #[test]
    fn xbm_short_data_rejected() {
        let src = "#define a_width 8\n#define a_height 3\nstatic char a_bits[] = { 0x00, 0x01 };";
        assert!(matches!(parse_xbm(src), Err(IconError::Malformed(_))));
        assert!(matches!(parse_xbm("nothing"), Err(IconError::Malformed(_))));
    }

    #[test]
    fn xpm_palette_and_transparency() {
        let icon = parse_xpm(DOT_XPM).unwrap();
        assert_eq!((icon.width, icon.height), (3, 2));
        let any = Color::rgb(9, 9, 9);
        assert_eq!(icon.pixel(0, 0, any, any), None);
        assert_eq!(icon.pixel(1, 0, any, any), Some(Color::rgb(255, 0, 0)));
        assert_eq!(icon.pixel(2, 1, any, any), Some(Color::rgb(255, 0, 0)));
        assert!(!icon.is_bitmap());
    }

    #[test]
    fn xpm_errors() {
        assert!(matches!(parse_xpm("\"2 1 1 1\", \". c None\""), Err(IconError::Malformed(_))));
        assert!(matches!(
            parse_xpm("\"1 1 1 1\", \". c bogusname\", \".\""),
            Err(IconError::Unsupported(_))
        ));
        assert!(matches!(
            parse_xpm("\"1 1 1 1\", \". c None\", \"x\""),
            Err(IconError::Malformed(_))
        ));
    }

    #[test]
    fn xpm_oversized_header_is_malformed() {
        let overflow_rows = "\"1 18446744073709551615 1 1\", \"a c #ff0000\", \"a\"";
        assert!(matches!(parse_xpm(overflow_rows), Err(IconError::Malformed(_))));
        // Huge width with the rows that exist: rejected before anything is allocated.
        let huge_width = "\"2305843009213693952 1 1 1\", \"a c #ff0000\", \"a\"";
        assert!(matches!(parse_xpm(huge_width), Err(IconError::Malformed(_))));
        let short_rows = "\"4000000000 1 1 1\", \"a c #ff0000\", \"aaaa\"";
        assert!(matches!(parse_xpm(short_rows), Err(IconError::Malformed(_))));
    }

    #[test]
    fn xbm_oversized_header_is_malformed() {
        let src = "#define a_width 4294967295\n#define a_height 4294967295\n\
static char a_bits[] = { 0x00 };";
        assert!(matches!(parse_xbm(src), Err(IconError::Malformed(_))));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ARROW_XBM.as_bytes()).unwrap();
        let icon = load_xbm(file.path()).unwrap();
        assert!(icon.is_bitmap());
        assert!(matches!(
            load_xbm(Path::new("/nonexistent/marquee.xbm")),
            Err(IconError::Io(_))
        ));
    }
}

//! Numeric payload sub-parsers. None of them fail: anything malformed reads as 0.

use crate::numeric::leading_int;

fn is_sign(c: char) -> bool {
    c == '+' || c == '-'
}

/// `WxH[+-]X[+-]Y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectSpec {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
}

pub fn parse_rect(s: &str) -> RectSpec {
    let (w, rest) = s.split_once('x').unwrap_or((s, ""));
    let (h, offsets) = rest.split_at(rest.find(is_sign).unwrap_or(rest.len()));
    let mut spec = RectSpec {
        width: leading_int(w),
        height: leading_int(h),
        ..RectSpec::default()
    };
    if !offsets.is_empty() {
        // Skip the x sign itself when looking for where y starts.
        let y_at = offsets[1..].find(is_sign).map_or(offsets.len(), |i| i + 1);
        let (x, y) = offsets.split_at(y_at);
        spec.x = leading_int(x);
        spec.y = leading_int(y);
    }
    spec
}

/// `D[+-]Arc`: a sign turns the full circle into a partial arc of `Arc` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CircleSpec {
    pub diameter: i32,
    pub arc: Option<i32>,
}

impl CircleSpec {
    /// Sweep in degrees.
    pub fn sweep(&self) -> i32 {
        self.arc.unwrap_or(360)
    }
}

pub fn parse_circle(s: &str) -> CircleSpec {
    match s.find(is_sign) {
        Some(at) => CircleSpec {
            diameter: leading_int(&s[..at]),
            arc: Some(leading_int(&s[at..])),
        },
        None => CircleSpec {
            diameter: leading_int(s),
            arc: None,
        },
    }
}

/// `Dx;Dy` with either half optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionSpec {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

pub fn parse_position(s: &str) -> PositionSpec {
    let axis = |part: &str| (!part.is_empty()).then(|| leading_int(part));
    match s.split_once(';') {
        Some((x, y)) => PositionSpec {
            x: axis(x),
            y: axis(y),
        },
        None => PositionSpec {
            x: axis(s),
            y: None,
        },
    }
}

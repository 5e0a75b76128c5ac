//! Inline markup for marquee lines.
//!
//! Text lines carry `^`-introduced drawing commands (`^fg(#ff0000)`, `^r(10x4)`,
//! `^p(;3)`, ...). This crate only recognizes and decodes them; drawing happens in
//! `core-render`.
//!
//! Design invariants:
//! * Parsing never fails. Unknown sequences are literal text, malformed numbers are 0.
//! * Payloads are bounded by `ARG_LEN` characters; the scan still consumes through `)`.
//! * Nothing is cached: every render re-lexes its source line.

pub mod numeric;
pub mod payload;
pub mod scan;

pub use numeric::leading_int;
pub use payload::{CircleSpec, PositionSpec, RectSpec, parse_circle, parse_position, parse_rect};
pub use scan::{ARG_LEN, Command, CommandKind, ESC_CHAR, Lexer, Piece, Scan, plain_text, scan_command};

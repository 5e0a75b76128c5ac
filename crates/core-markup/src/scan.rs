//! Escape-command recognition and line lexing.
//!
//! A command is `^` + mnemonic + `(` + payload + `)`. `scan_command` recognizes
//! exactly one command at an escape position; `Lexer` walks a whole line and splits
//! it into literal runs and commands in the order the renderer consumes them:
//!
//! ```text
//! "ab^fg(red)cd^^e"  =>  Run("ab"), Command(fg "red"), Run("cd"), Run("^e")
//! ```
//!
//! Invariants:
//! * Every escape character ends the current run, so a `Run` is yielded at each
//!   escape and once more at end of line (possibly empty).
//! * A `Command` is always followed by the `Run` it applies to.
//! * `^^` and unrecognized sequences both put one literal `^` into the next run;
//!   the former skips both characters, the latter only the escape, so the scan
//!   always makes progress.

use tracing::{debug, trace};

pub const ESC_CHAR: char = '^';

/// Maximum payload length in characters; longer payloads are truncated.
pub const ARG_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Background,
    IgnoreBackground,
    Foreground,
    TitleWindow,
    Icon,
    Rect,
    RectOutline,
    Position,
    AbsPosition,
    Circle,
    CircleOutline,
    /// Reserved sensitive-area marker: recognized and consumed, never drawn.
    SensitiveArea,
}

const MNEMONICS: &[(&str, CommandKind)] = &[
    ("bg(", CommandKind::Background),
    ("ib(", CommandKind::IgnoreBackground),
    ("fg(", CommandKind::Foreground),
    ("tw(", CommandKind::TitleWindow),
    ("i(", CommandKind::Icon),
    ("r(", CommandKind::Rect),
    ("ro(", CommandKind::RectOutline),
    ("p(", CommandKind::Position),
    ("pa(", CommandKind::AbsPosition),
    ("c(", CommandKind::Circle),
    ("co(", CommandKind::CircleOutline),
    ("sa(", CommandKind::SensitiveArea),
];

impl CommandKind {
    /// Mnemonic without the escape character, including the opening parenthesis.
    pub fn mnemonic(self) -> &'static str {
        MNEMONICS
            .iter()
            .find(|(_, k)| *k == self)
            .map_or("", |(m, _)| *m)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub payload: String,
}

impl Command {
    pub fn new(kind: CommandKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }
}

/// Result of scanning at one escape position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// Recognized command; `consumed` counts bytes from the escape through `)`.
    Command { command: Command, consumed: usize },
    /// `^^`: one literal escape character.
    Escape,
    /// Escape followed by nothing we know.
    Unrecognized,
}

impl Scan {
    /// Bytes to skip from the escape position.
    pub fn consumed(&self) -> usize {
        match self {
            Scan::Command { consumed, .. } => *consumed,
            Scan::Escape => 2 * ESC_CHAR.len_utf8(),
            Scan::Unrecognized => ESC_CHAR.len_utf8(),
        }
    }
}

/// Recognize one command at byte offset `at`, which must point at `ESC_CHAR`.
pub fn scan_command(line: &str, at: usize) -> Scan {
    let rest = &line[at + ESC_CHAR.len_utf8()..];
    if rest.starts_with(ESC_CHAR) {
        return Scan::Escape;
    }
    let Some((mnemonic, kind)) = MNEMONICS.iter().find(|(m, _)| rest.starts_with(m)) else {
        trace!(target: "markup.scan", at, "unrecognized_escape");
        return Scan::Unrecognized;
    };
    let body = &rest[mnemonic.len()..];
    let (raw, closed) = match body.find(')') {
        Some(end) => (&body[..end], true),
        None => (body, false),
    };
    let payload: String = raw.chars().take(ARG_LEN).collect();
    if payload.len() < raw.len() {
        debug!(target: "markup.scan", ?kind, len = raw.chars().count(), "payload_truncated");
    }
    let consumed = ESC_CHAR.len_utf8() + mnemonic.len() + raw.len() + usize::from(closed);
    Scan::Command {
        command: Command::new(*kind, payload),
        consumed,
    }
}

/// Lexer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Run(String),
    Command(Command),
}

/// Splits a line into runs and commands; see module docs for the ordering contract.
#[derive(Debug)]
pub struct Lexer<'a> {
    line: &'a str,
    pos: usize,
    run: String,
    queued: Option<Command>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            run: String::new(),
            queued: None,
            finished: false,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Piece;

    fn next(&mut self) -> Option<Piece> {
        if let Some(cmd) = self.queued.take() {
            return Some(Piece::Command(cmd));
        }
        if self.finished {
            return None;
        }
        while let Some(c) = self.line[self.pos..].chars().next() {
            if c == ESC_CHAR {
                let run = std::mem::take(&mut self.run);
                let scan = scan_command(self.line, self.pos);
                self.pos += scan.consumed();
                match scan {
                    Scan::Command { command, .. } => self.queued = Some(command),
                    Scan::Escape | Scan::Unrecognized => self.run.push(ESC_CHAR),
                }
                return Some(Piece::Run(run));
            }
            self.run.push(c);
            self.pos += c.len_utf8();
        }
        self.finished = true;
        Some(Piece::Run(std::mem::take(&mut self.run)))
    }
}

/// Plain-text projection: literal text with every command removed.
pub fn plain_text(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for piece in Lexer::new(line) {
        if let Piece::Run(run) = piece {
            out.push_str(&run);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cmd(line: &str) -> (Command, usize) {
        match scan_command(line, 0) {
            Scan::Command { command, consumed } => (command, consumed),
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn recognizes_every_mnemonic() {
        for (m, kind) in MNEMONICS {
            let line = format!("^{m}arg)tail");
            let (c, consumed) = cmd(&line);
            assert_eq!(c.kind, *kind);
            assert_eq!(c.payload, "arg");
            assert_eq!(&line[consumed..], "tail");
        }
    }

    #[test]
    fn two_letter_mnemonics_are_not_shadowed() {
        assert_eq!(cmd("^ro(4x4)").0.kind, CommandKind::RectOutline);
        assert_eq!(cmd("^pa(3)").0.kind, CommandKind::AbsPosition);
        assert_eq!(cmd("^co(5)").0.kind, CommandKind::CircleOutline);
        assert_eq!(cmd("^ib(1)").0.kind, CommandKind::IgnoreBackground);
        assert_eq!(cmd("^i(x.xbm)").0.kind, CommandKind::Icon);
    }

    #[test]
    fn doubled_escape_is_not_a_command() {
        assert_eq!(scan_command("^^x", 0), Scan::Escape);
        assert_eq!(Scan::Escape.consumed(), 2);
    }

    #[test]
    fn unknown_sequence_advances_one() {
        assert_eq!(scan_command("^zz(1)", 0), Scan::Unrecognized);
        assert_eq!(scan_command("^", 0), Scan::Unrecognized);
        assert_eq!(Scan::Unrecognized.consumed(), 1);
    }

    #[test]
    fn empty_payload() {
        let (c, consumed) = cmd("^fg()");
        assert_eq!(c, Command::new(CommandKind::Foreground, ""));
        assert_eq!(consumed, 5);
    }

    #[test]
    fn unterminated_payload_runs_to_end() {
        let (c, consumed) = cmd("^fg(#fff");
        assert_eq!(c.payload, "#fff");
        assert_eq!(consumed, 8);
    }

    #[test]
    fn long_payload_truncated_but_fully_consumed() {
        let long = "a".repeat(ARG_LEN + 40);
        let line = format!("^i({long})rest");
        let (c, consumed) = cmd(&line);
        assert_eq!(c.payload.len(), ARG_LEN);
        assert_eq!(&line[consumed..], "rest");
    }

    #[test]
    fn scan_at_offset() {
        let line = "abc^bg(#000)def";
        let (c, consumed) = match scan_command(line, 3) {
            Scan::Command { command, consumed } => (command, consumed),
            other => panic!("{other:?}"),
        };
        assert_eq!(c.payload, "#000");
        assert_eq!(&line[3 + consumed..], "def");
    }

    #[test]
    fn lexer_orders_runs_and_commands() {
        let pieces: Vec<_> = Lexer::new("ab^fg(red)cd^^e").collect();
        assert_eq!(
            pieces,
            vec![
                Piece::Run("ab".into()),
                Piece::Command(Command::new(CommandKind::Foreground, "red")),
                Piece::Run("cd".into()),
                Piece::Run("^e".into()),
            ]
        );
    }

    #[test]
    fn lexer_trailing_command_gets_empty_run() {
        let pieces: Vec<_> = Lexer::new("x^fg()").collect();
        assert_eq!(
            pieces,
            vec![
                Piece::Run("x".into()),
                Piece::Command(Command::new(CommandKind::Foreground, "")),
                Piece::Run(String::new()),
            ]
        );
    }

    #[test]
    fn lexer_empty_line_yields_one_empty_run() {
        let pieces: Vec<_> = Lexer::new("").collect();
        assert_eq!(pieces, vec![Piece::Run(String::new())]);
    }

    #[test]
    fn plain_text_strips_commands() {
        assert_eq!(plain_text("^fg(#ff0000)hello^fg()"), "hello");
        assert_eq!(plain_text("a^^b"), "a^b");
        assert_eq!(plain_text("^r(10x4)^p(3)cpu ^c(6) 42%"), "cpu  42%");
        assert_eq!(plain_text("100^%"), "100^%");
        assert_eq!(plain_text("trailing^"), "trailing^");
    }

    #[test]
    fn plain_text_keeps_multibyte_text() {
        assert_eq!(plain_text("é^fg(red)ü ☃"), "éü ☃");
    }
}

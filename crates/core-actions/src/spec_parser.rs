//! Two-stage splitting of event specifications.
//!
//! ```text
//! "button1=exec:xterm,exit;onstart=print:hi"
//!   stage 1 (`split_events`):  ("button1", Some("exec:xterm,exit")), ("onstart", Some("print:hi"))
//!   stage 2 (`split_actions`): ("exec", Some("xterm")), ("exit", None)
//! ```
//!
//! Both stages are pure and skip empty segments; name resolution happens in the table.

/// One `event[=actions]` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSegment<'a> {
    pub event: &'a str,
    /// `None` when the segment has no `=`.
    pub actions: Option<&'a str>,
}

/// One `name[:options]` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSegment<'a> {
    pub name: &'a str,
    pub options: Option<&'a str>,
}

pub fn split_events(spec: &str) -> impl Iterator<Item = EventSegment<'_>> {
    spec.split(';').filter(|s| !s.is_empty()).map(|seg| {
        let (event, actions) = match seg.split_once('=') {
            Some((e, a)) => (e, Some(a)),
            None => (seg, None),
        };
        EventSegment { event, actions }
    })
}

pub fn split_actions(list: &str) -> impl Iterator<Item = ActionSegment<'_>> {
    list.split(',').filter(|s| !s.is_empty()).map(|seg| {
        let (name, options) = match seg.split_once(':') {
            Some((n, o)) => (n, Some(o)),
            None => (seg, None),
        };
        ActionSegment { name, options }
    })
}

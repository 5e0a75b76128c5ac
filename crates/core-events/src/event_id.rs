//! Symbolic event identifiers and name resolution.
//!
//! Every event that can carry an action chain has a stable integer code. Built-in
//! events occupy a small dense range; key events live in a disjoint subspace
//! starting at `KEY_MARKER` and are addressed by keysym value.
//!
//! Name resolution quirk (kept on purpose for specification compatibility): a table
//! entry matches when the *input starts with the entry name*, and the first entry in
//! declaration order wins. `button10` therefore resolves to `button1`, and any name
//! sharing a prefix with an earlier entry is unreachable.

use crate::keysym;
use std::fmt;
use tracing::trace;

/// Offset separating key events from built-in events.
pub const KEY_MARKER: i64 = 0x1000_0000;

/// Highest pointer button carrying its own event.
pub const MAX_BUTTON: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventId {
    OnStart,
    OnExit,
    OnNewInput,
    /// Pointer button release, 1-based (`1..=MAX_BUTTON`).
    Button(u8),
    EnterTitle,
    LeaveTitle,
    EnterSlave,
    LeaveSlave,
    SigUsr1,
    SigUsr2,
    /// Key press addressed by keysym.
    Key(u32),
}

/// Static name table in resolution order.
pub const EVENT_NAMES: &[(&str, EventId)] = &[
    ("onstart", EventId::OnStart),
    ("onexit", EventId::OnExit),
    ("onnewinput", EventId::OnNewInput),
    ("button1", EventId::Button(1)),
    ("button2", EventId::Button(2)),
    ("button3", EventId::Button(3)),
    ("button4", EventId::Button(4)),
    ("button5", EventId::Button(5)),
    ("button6", EventId::Button(6)),
    ("button7", EventId::Button(7)),
    ("entertitle", EventId::EnterTitle),
    ("leavetitle", EventId::LeaveTitle),
    ("enterslave", EventId::EnterSlave),
    ("leaveslave", EventId::LeaveSlave),
    ("sigusr1", EventId::SigUsr1),
    ("sigusr2", EventId::SigUsr2),
];

impl EventId {
    /// Stable integer code. Key events are `KEY_MARKER + keysym`.
    pub const fn code(self) -> i64 {
        match self {
            EventId::OnStart => 0,
            EventId::OnExit => 1,
            EventId::OnNewInput => 2,
            EventId::Button(n) => 2 + n as i64,
            EventId::EnterTitle => 10,
            EventId::LeaveTitle => 11,
            EventId::EnterSlave => 12,
            EventId::LeaveSlave => 13,
            EventId::SigUsr1 => 14,
            EventId::SigUsr2 => 15,
            EventId::Key(ks) => KEY_MARKER + ks as i64,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        if code >= KEY_MARKER {
            return u32::try_from(code - KEY_MARKER).ok().map(EventId::Key);
        }
        EVENT_NAMES
            .iter()
            .map(|(_, id)| *id)
            .find(|id| id.code() == code)
    }

    /// Pointer button event, `None` for buttons without a binding slot.
    pub fn button(n: u8) -> Option<Self> {
        (1..=MAX_BUTTON).contains(&n).then_some(EventId::Button(n))
    }

    /// Canonical table name (key events have none).
    pub fn name(self) -> Option<&'static str> {
        EVENT_NAMES
            .iter()
            .find(|(_, id)| *id == self)
            .map(|(name, _)| *name)
    }

    pub fn is_key(self) -> bool {
        matches!(self, EventId::Key(_))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.name()) {
            (_, Some(name)) => f.write_str(name),
            (EventId::Key(ks), None) => write!(f, "key_{ks:#x}"),
            _ => write!(f, "event#{}", self.code()),
        }
    }
}

/// Resolve an event name from a specification string.
///
/// `key_<X>` is tried first; `<X>` must be a known keysym name. Everything else goes
/// through the prefix table.
pub fn resolve_event_id(name: &str) -> Option<EventId> {
    if let Some(ks) = name.strip_prefix("key_").and_then(keysym::from_name) {
        trace!(target: "events.resolve", name, keysym = ks, "key_event");
        return Some(EventId::Key(ks));
    }
    let found = EVENT_NAMES
        .iter()
        .find(|(entry, _)| name.starts_with(entry))
        .map(|(_, id)| *id);
    trace!(target: "events.resolve", name, found = ?found, "table_lookup");
    found
}

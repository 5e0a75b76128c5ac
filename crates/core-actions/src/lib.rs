//! Event-to-action binding and execution.
//!
//! A specification string such as
//! `button1=menuexec;button3=exit:13;onstart=exec:notify-send hi` is parsed once at
//! startup into an `EventTable`; the event loop then calls `EventTable::dispatch` for
//! every observed `EventId`.
//!
//! Design invariants:
//! * Redefining an event replaces its chain; it never appends.
//! * Chains hold at most `MAX_ACTIONS - 1` actions and each action at most
//!   `MAX_OPTIONS - 1` options. Excess input is dropped, never an error.
//! * Unknown event and action names are skipped with a debug log.
//! * The table is an owned value; there is no global registry.

pub mod action;
pub mod dispatcher;
pub mod options;
pub mod spec_parser;
pub mod table;

pub use action::{ACTION_NAMES, Action, ActionKind, resolve_action};
pub use dispatcher::{ActionHost, DispatchResult, execute};
pub use options::OptionList;
pub use table::EventTable;

pub const MAX_ACTIONS: usize = 64;
pub const MAX_OPTIONS: usize = 64;

/// Bindings installed before the user's specification. Users override any of them by
/// defining the same event again.
pub const DEFAULT_SPEC: &str = "entertitle=uncollapse;leaveslave=collapse;\
button1=menuexec;button2=togglestick;button3=exit:13;\
button4=scrollup;button5=scrolldown";

/// Build the startup table: defaults first, then the user's specification.
pub fn build_table(user_spec: Option<&str>) -> EventTable {
    let mut table = EventTable::new();
    table.parse_specification(DEFAULT_SPEC);
    if let Some(spec) = user_spec {
        let defined = table.parse_specification(spec);
        tracing::info!(target: "actions.table", defined, "user_spec_loaded");
    }
    table
}

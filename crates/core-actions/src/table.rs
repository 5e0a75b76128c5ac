//! Event -> action chain table.

use core_events::{EventId, resolve_event_id};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::MAX_ACTIONS;
use crate::action::{Action, resolve_action};
use crate::options::OptionList;
use crate::spec_parser::{split_actions, split_events};

type Chain = SmallVec<[Action; 4]>;

/// Bindings keyed by event, in first-definition order. Redefining an event replaces its chain.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    entries: Vec<(EventId, Chain)>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `event` to the actions in `actions` (a `name[:opts],...` list). Unknown action names
    /// are dropped; `None` binds the event to an empty chain.
    pub fn define(&mut self, event: EventId, actions: Option<&str>) {
        let mut chain = Chain::new();
        for seg in actions.into_iter().flat_map(split_actions) {
            let Some(kind) = resolve_action(seg.name) else {
                debug!(target: "actions.table", %event, action = seg.name, "unknown_action");
                continue;
            };
            if chain.len() == MAX_ACTIONS - 1 {
                debug!(target: "actions.table", %event, "action_chain_truncated");
                break;
            }
            chain.push(Action::from_parts(kind, OptionList::parse(seg.options)));
        }
        trace!(target: "actions.table", %event, len = chain.len(), "define");
        match self.entries.iter_mut().find(|(id, _)| *id == event) {
            Some((_, existing)) => *existing = chain,
            None => self.entries.push((event, chain)),
        }
    }

    /// Parse a full `event=actions;...` specification. Returns how many events were defined.
    pub fn parse_specification(&mut self, spec: &str) -> usize {
        let mut defined = 0;
        for seg in split_events(spec) {
            let Some(event) = resolve_event_id(seg.event) else {
                debug!(target: "actions.table", event = seg.event, "unknown_event");
                continue;
            };
            self.define(event, seg.actions);
            defined += 1;
        }
        defined
    }

    /// True when `event` has been defined, even with an empty chain.
    pub fn lookup(&self, event: EventId) -> bool {
        self.entries.iter().any(|(id, _)| *id == event)
    }

    pub fn bindings(&self, event: EventId) -> &[Action] {
        self.entries
            .iter()
            .find(|(id, _)| *id == event)
            .map_or(&[], |(_, chain)| chain.as_slice())
    }

    pub fn events(&self) -> impl Iterator<Item = EventId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release every binding.
    pub fn teardown(&mut self) {
        debug!(target: "actions.table", events = self.entries.len(), "teardown");
        self.entries.clear();
    }
}

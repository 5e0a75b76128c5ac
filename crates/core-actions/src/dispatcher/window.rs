use core_state::{BarState, Grabs};

use super::DispatchResult;

// Collapse and stick only apply to a vertical slave window that has rows.
fn slave_adjustable(state: &BarState) -> bool {
    state.has_lines() && !state.slave.horizontal
}

pub(super) fn collapse(state: &mut BarState) -> DispatchResult {
    if !slave_adjustable(state) || state.slave.sticky || !state.slave.mapped {
        return DispatchResult::clean();
    }
    state.slave.mapped = false;
    DispatchResult::dirty()
}

pub(super) fn uncollapse(state: &mut BarState) -> DispatchResult {
    if !slave_adjustable(state) || state.slave.sticky {
        return DispatchResult::clean();
    }
    state.slave.mapped = true;
    state.body_dirty = true;
    DispatchResult::dirty()
}

pub(super) fn toggle_collapse(state: &mut BarState) -> DispatchResult {
    if state.has_lines() && !state.slave.mapped {
        uncollapse(state)
    } else {
        collapse(state)
    }
}

pub(super) fn set_sticky(state: &mut BarState, f: impl FnOnce(bool) -> bool) -> DispatchResult {
    if slave_adjustable(state) {
        state.slave.sticky = f(state.slave.sticky);
    }
    DispatchResult::clean()
}

pub(super) fn set_hidden(state: &mut BarState, hidden: bool) -> DispatchResult {
    let changed = state.title.hidden != hidden;
    state.title.hidden = hidden;
    DispatchResult::dirty_if(changed)
}

pub(super) fn grab(state: &mut BarState, f: impl FnOnce(&mut Grabs)) -> DispatchResult {
    f(&mut state.grabs);
    DispatchResult::clean()
}

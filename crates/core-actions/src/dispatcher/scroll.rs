use core_state::BarState;

use super::DispatchResult;

pub(super) fn by(state: &mut BarState, n: isize) -> DispatchResult {
    DispatchResult::dirty_if(state.scroll_by(n))
}

pub(super) fn home(state: &mut BarState) -> DispatchResult {
    state.scroll_home();
    DispatchResult::dirty_if(state.body_dirty)
}

pub(super) fn end(state: &mut BarState) -> DispatchResult {
    state.scroll_end();
    DispatchResult::dirty_if(state.body_dirty)
}

use core_markup::plain_text;
use tracing::trace;

use super::{ActionHost, DispatchResult};
use crate::options::OptionList;

// Consume the menu selection and return the selected row's raw text.
fn take_selected<H: ActionHost + ?Sized>(host: &mut H) -> Option<String> {
    let state = host.state();
    let index = state.take_menu_selection()?;
    let text = state.ring.get(index).map(str::to_string);
    trace!(target: "actions.dispatch", index, "menu_selection_consumed");
    text
}

pub(super) fn print<H: ActionHost + ?Sized>(
    suffix: &OptionList,
    parse: bool,
    host: &mut H,
) -> DispatchResult {
    let Some(raw) = take_selected(host) else {
        return DispatchResult::clean();
    };
    let mut line = if parse { plain_text(&raw) } else { raw };
    for part in suffix.iter() {
        line.push_str(part);
    }
    host.print_line(&line);
    DispatchResult::clean()
}

pub(super) fn exec<H: ActionHost + ?Sized>(host: &mut H) -> DispatchResult {
    if let Some(raw) = take_selected(host) {
        host.spawn(&plain_text(&raw));
    }
    DispatchResult::clean()
}

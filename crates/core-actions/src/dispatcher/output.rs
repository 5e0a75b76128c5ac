use tracing::{debug, trace};

use super::{ActionHost, DispatchResult};
use crate::options::OptionList;

pub(super) fn print<H: ActionHost + ?Sized>(lines: &OptionList, host: &mut H) -> DispatchResult {
    for line in lines.iter() {
        host.print_line(line);
    }
    DispatchResult::clean()
}

pub(super) fn exec<H: ActionHost + ?Sized>(commands: &OptionList, host: &mut H) -> DispatchResult {
    for command in commands.iter() {
        if command.is_empty() {
            trace!(target: "actions.dispatch", "skip_empty_command");
            continue;
        }
        host.spawn(command);
    }
    DispatchResult::clean()
}

pub(super) fn exit<H: ActionHost + ?Sized>(code: i32, host: &mut H) -> DispatchResult {
    debug!(target: "actions.dispatch", code, "exit_requested");
    host.state().run.request_exit(code);
    DispatchResult::quit()
}

pub(super) fn xevent<H: ActionHost + ?Sized>(
    message: &str,
    data: &[i64],
    host: &mut H,
) -> DispatchResult {
    if !message.is_empty() {
        host.send_message(message, data);
    }
    DispatchResult::clean()
}

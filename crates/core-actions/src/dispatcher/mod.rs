//! Executing bound action chains.
//!
//! Actions fall into four groups, one sub-module each:
//! * `output` - print, exec, exit, xevent
//! * `window` - collapse/stick/hide toggles, raise/lower, input grabs
//! * `scroll` - scroll up/down/home/end
//! * `menu`   - menu selection consumers
//!
//! Handlers mutate `BarState` through the host and report what changed; the caller
//! repaints from state afterwards. Surface-only effects (raise, lower, client messages)
//! and side channels (stdout, process spawn) go through `ActionHost`.

use core_events::EventId;
use core_state::BarState;
use tracing::debug;

use crate::action::Action;
use crate::table::EventTable;

mod menu;
mod output;
mod scroll;
mod window;

/// Environment the dispatcher acts on.
pub trait ActionHost {
    fn state(&mut self) -> &mut BarState;
    /// Write one line to the output stream.
    fn print_line(&mut self, text: &str);
    /// Fire-and-forget shell command.
    fn spawn(&mut self, command: &str);
    /// Deliver a named client message. Hosts without such a channel ignore it.
    fn send_message(&mut self, name: &str, data: &[i64]) {
        debug!(target: "actions.dispatch", name, ?data, "client_message_unsupported");
    }
    fn raise(&mut self) {}
    fn lower(&mut self) {}
}

/// Outcome of running an action or a whole chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Something visible changed; repaint.
    pub dirty: bool,
    /// The run flag was cleared.
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            dirty: false,
            quit: true,
        }
    }
    fn dirty_if(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
    pub fn merge(self, other: Self) -> Self {
        Self {
            dirty: self.dirty || other.dirty,
            quit: self.quit || other.quit,
        }
    }
}

/// Run one action.
pub fn execute<H: ActionHost + ?Sized>(action: &Action, host: &mut H) -> DispatchResult {
    match action {
        Action::Print(lines) => output::print(lines, host),
        Action::Exec(commands) => output::exec(commands, host),
        Action::Exit { code } => output::exit(*code, host),
        Action::XEvent { message, data } => output::xevent(message, data, host),
        Action::Collapse => window::collapse(host.state()),
        Action::Uncollapse => window::uncollapse(host.state()),
        Action::ToggleCollapse => window::toggle_collapse(host.state()),
        Action::Stick => window::set_sticky(host.state(), |_| true),
        Action::Unstick => window::set_sticky(host.state(), |_| false),
        Action::ToggleStick => window::set_sticky(host.state(), |s| !s),
        Action::Hide => window::set_hidden(host.state(), true),
        Action::Unhide => window::set_hidden(host.state(), false),
        Action::ToggleHide => {
            let hidden = host.state().title.hidden;
            window::set_hidden(host.state(), !hidden)
        }
        Action::Raise => {
            host.raise();
            DispatchResult::clean()
        }
        Action::Lower => {
            host.lower();
            DispatchResult::clean()
        }
        Action::GrabKeys => window::grab(host.state(), |g| g.keys = true),
        Action::UngrabKeys => window::grab(host.state(), |g| g.keys = false),
        Action::GrabMouse => window::grab(host.state(), |g| g.mouse = true),
        Action::UngrabMouse => window::grab(host.state(), |g| g.mouse = false),
        Action::ScrollUp { lines } => scroll::by(host.state(), -(*lines as isize)),
        Action::ScrollDown { lines } => scroll::by(host.state(), *lines as isize),
        Action::ScrollHome => scroll::home(host.state()),
        Action::ScrollEnd => scroll::end(host.state()),
        Action::MenuPrint { suffix } => menu::print(suffix, true, host),
        Action::MenuPrintNoParse { suffix } => menu::print(suffix, false, host),
        Action::MenuExec => menu::exec(host),
    }
}

impl EventTable {
    /// Run the chain bound to `event` in order. Unbound events do nothing.
    pub fn dispatch<H: ActionHost + ?Sized>(&self, event: EventId, host: &mut H) -> DispatchResult {
        let chain = self.bindings(event);
        if chain.is_empty() {
            return DispatchResult::clean();
        }
        debug!(target: "actions.dispatch", %event, len = chain.len(), "dispatch");
        chain
            .iter()
            .fold(DispatchResult::clean(), |acc, action| acc.merge(execute(action, host)))
    }
}

//! Action names and their typed form.

use core_markup::leading_int;
use smallvec::SmallVec;

use crate::options::OptionList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Print,
    Exec,
    Exit,
    XEvent,
    Collapse,
    Uncollapse,
    ToggleCollapse,
    Stick,
    Unstick,
    ToggleStick,
    Hide,
    Unhide,
    ToggleHide,
    ScrollUp,
    ScrollDown,
    MenuPrint,
    MenuPrintNoParse,
    MenuExec,
    Raise,
    Lower,
    ScrollHome,
    ScrollEnd,
    GrabKeys,
    UngrabKeys,
    GrabMouse,
    UngrabMouse,
}

pub const ACTION_NAMES: &[(&str, ActionKind)] = &[
    ("print", ActionKind::Print),
    ("exec", ActionKind::Exec),
    ("exit", ActionKind::Exit),
    ("xevent", ActionKind::XEvent),
    ("collapse", ActionKind::Collapse),
    ("uncollapse", ActionKind::Uncollapse),
    ("togglecollapse", ActionKind::ToggleCollapse),
    ("stick", ActionKind::Stick),
    ("unstick", ActionKind::Unstick),
    ("togglestick", ActionKind::ToggleStick),
    ("hide", ActionKind::Hide),
    ("unhide", ActionKind::Unhide),
    ("togglehide", ActionKind::ToggleHide),
    ("scrollup", ActionKind::ScrollUp),
    ("scrolldown", ActionKind::ScrollDown),
    ("menuprint", ActionKind::MenuPrint),
    ("menuprint_noparse", ActionKind::MenuPrintNoParse),
    ("menuexec", ActionKind::MenuExec),
    ("raise", ActionKind::Raise),
    ("lower", ActionKind::Lower),
    ("scrollhome", ActionKind::ScrollHome),
    ("scrollend", ActionKind::ScrollEnd),
    ("grabkeys", ActionKind::GrabKeys),
    ("ungrabkeys", ActionKind::UngrabKeys),
    ("grabmouse", ActionKind::GrabMouse),
    ("ungrabmouse", ActionKind::UngrabMouse),
];

/// Case-sensitive exact lookup.
pub fn resolve_action(name: &str) -> Option<ActionKind> {
    ACTION_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, k)| *k)
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        ACTION_NAMES
            .iter()
            .find(|(_, k)| *k == self)
            .map_or("", |(n, _)| *n)
    }
}

/// Client-message payload slots carried by `xevent`.
pub const XEVENT_DATA_LEN: usize = 5;

/// A bound action with its arguments already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print every option on its own line.
    Print(OptionList),
    /// Spawn every option as a shell command.
    Exec(OptionList),
    Exit { code: i32 },
    /// Named client message; silently ignored when `message` is empty.
    XEvent {
        message: String,
        data: SmallVec<[i64; XEVENT_DATA_LEN]>,
    },
    Collapse,
    Uncollapse,
    ToggleCollapse,
    Stick,
    Unstick,
    ToggleStick,
    Hide,
    Unhide,
    ToggleHide,
    ScrollUp { lines: i32 },
    ScrollDown { lines: i32 },
    /// Print the selected row's plain text followed by every option.
    MenuPrint { suffix: OptionList },
    /// Like `MenuPrint` but with the raw markup of the row.
    MenuPrintNoParse { suffix: OptionList },
    MenuExec,
    Raise,
    Lower,
    ScrollHome,
    ScrollEnd,
    GrabKeys,
    UngrabKeys,
    GrabMouse,
    UngrabMouse,
}

impl Action {
    pub fn from_parts(kind: ActionKind, options: OptionList) -> Action {
        let count = |default: i32| options.first().map_or(default, leading_int);
        match kind {
            ActionKind::Print => Action::Print(options),
            ActionKind::Exec => Action::Exec(options),
            ActionKind::Exit => Action::Exit { code: count(0) },
            ActionKind::XEvent => Action::XEvent {
                message: options.first().unwrap_or_default().to_string(),
                data: options
                    .iter()
                    .skip(1)
                    .take(XEVENT_DATA_LEN)
                    .map(|d| i64::from(leading_int(d)))
                    .collect(),
            },
            ActionKind::Collapse => Action::Collapse,
            ActionKind::Uncollapse => Action::Uncollapse,
            ActionKind::ToggleCollapse => Action::ToggleCollapse,
            ActionKind::Stick => Action::Stick,
            ActionKind::Unstick => Action::Unstick,
            ActionKind::ToggleStick => Action::ToggleStick,
            ActionKind::Hide => Action::Hide,
            ActionKind::Unhide => Action::Unhide,
            ActionKind::ToggleHide => Action::ToggleHide,
            ActionKind::ScrollUp => Action::ScrollUp { lines: count(1) },
            ActionKind::ScrollDown => Action::ScrollDown { lines: count(1) },
            ActionKind::MenuPrint => Action::MenuPrint { suffix: options },
            ActionKind::MenuPrintNoParse => Action::MenuPrintNoParse { suffix: options },
            ActionKind::MenuExec => Action::MenuExec,
            ActionKind::Raise => Action::Raise,
            ActionKind::Lower => Action::Lower,
            ActionKind::ScrollHome => Action::ScrollHome,
            ActionKind::ScrollEnd => Action::ScrollEnd,
            ActionKind::GrabKeys => Action::GrabKeys,
            ActionKind::UngrabKeys => Action::UngrabKeys,
            ActionKind::GrabMouse => Action::GrabMouse,
            ActionKind::UngrabMouse => Action::UngrabMouse,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Print(_) => ActionKind::Print,
            Action::Exec(_) => ActionKind::Exec,
            Action::Exit { .. } => ActionKind::Exit,
            Action::XEvent { .. } => ActionKind::XEvent,
            Action::Collapse => ActionKind::Collapse,
            Action::Uncollapse => ActionKind::Uncollapse,
            Action::ToggleCollapse => ActionKind::ToggleCollapse,
            Action::Stick => ActionKind::Stick,
            Action::Unstick => ActionKind::Unstick,
            Action::ToggleStick => ActionKind::ToggleStick,
            Action::Hide => ActionKind::Hide,
            Action::Unhide => ActionKind::Unhide,
            Action::ToggleHide => ActionKind::ToggleHide,
            Action::ScrollUp { .. } => ActionKind::ScrollUp,
            Action::ScrollDown { .. } => ActionKind::ScrollDown,
            Action::MenuPrint { .. } => ActionKind::MenuPrint,
            Action::MenuPrintNoParse { .. } => ActionKind::MenuPrintNoParse,
            Action::MenuExec => ActionKind::MenuExec,
            Action::Raise => ActionKind::Raise,
            Action::Lower => ActionKind::Lower,
            Action::ScrollHome => ActionKind::ScrollHome,
            Action::ScrollEnd => ActionKind::ScrollEnd,
            Action::GrabKeys => ActionKind::GrabKeys,
            Action::UngrabKeys => ActionKind::UngrabKeys,
            Action::GrabMouse => ActionKind::GrabMouse,
            Action::UngrabMouse => ActionKind::UngrabMouse,
        }
    }
}

use core_events::keysym;
use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind};

/// Map a crossterm key press into a keysym.
///
/// Returns `None` for releases and for key codes without a keysym (media keys, lone
/// modifiers). Modifiers are not part of the keysym; shifted characters already arrive
/// as their shifted form.
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<u32> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    map_key_code(&event.code)
}

pub(crate) fn map_key_code(code: &CKeyCode) -> Option<u32> {
    let sym = match code {
        CKeyCode::Char(c) => keysym::for_char(*c),
        CKeyCode::Enter => keysym::RETURN,
        CKeyCode::Esc => keysym::ESCAPE,
        CKeyCode::Backspace => keysym::BACKSPACE,
        CKeyCode::Tab | CKeyCode::BackTab => keysym::TAB,
        CKeyCode::Up => keysym::UP,
        CKeyCode::Down => keysym::DOWN,
        CKeyCode::Left => keysym::LEFT,
        CKeyCode::Right => keysym::RIGHT,
        CKeyCode::Home => keysym::HOME,
        CKeyCode::End => keysym::END,
        CKeyCode::PageUp => keysym::PAGE_UP,
        CKeyCode::PageDown => keysym::PAGE_DOWN,
        CKeyCode::Insert => keysym::INSERT,
        CKeyCode::Delete => keysym::DELETE,
        CKeyCode::F(n) => return keysym::function_key(*n),
        CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(sym)
}

//! Terminal backend: session setup and a cell-grid `Canvas`.
//!
//! The bar draws on stderr so stdout stays a clean channel for `print`/`menuprint`
//! output. Entering the session switches to the alternate screen, enables raw mode and
//! turns on mouse capture and focus reporting; leaving undoes all of it.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::stderr;

pub mod canvas;
pub mod capabilities;
pub mod grid;
pub mod scratch;

pub use canvas::{SlotLayout, TerminalCanvas};
pub use capabilities::TerminalCapabilities;
pub use grid::{Cell, CellGrid, text_width};
pub use scratch::GridScratch;

/// The bar's claim on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalSession {
    active: bool,
}

/// Restores the terminal when dropped, including on early return and unwinding.
#[must_use = "the terminal is restored when the guard drops"]
pub struct SessionGuard<'a> {
    session: &'a mut TerminalSession,
}

impl TerminalSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    /// Take over the terminal for the lifetime of the returned guard.
    pub fn enter(&mut self) -> Result<SessionGuard<'_>> {
        if !self.active {
            enable_raw_mode()?;
            execute!(
                stderr(),
                EnterAlternateScreen,
                Hide,
                EnableMouseCapture,
                EnableFocusChange
            )?;
            self.active = true;
            tracing::debug!(target: "terminal", "session_entered");
        }
        Ok(SessionGuard { session: self })
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            stderr(),
            DisableFocusChange,
            DisableMouseCapture,
            Show,
            LeaveAlternateScreen
        )?;
        disable_raw_mode()?;
        tracing::debug!(target: "terminal", "session_restored");
        Ok(())
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.session.restore() {
            tracing::warn!(target: "terminal", %err, "session_restore_failed");
        }
    }
}

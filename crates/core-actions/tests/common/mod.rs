#![allow(dead_code)] // Shared across test binaries; each uses a subset of helpers.

use core_actions::ActionHost;
use core_state::{BarState, SlaveWindow, TitleWindow};

/// Host that records side effects instead of performing them.
pub struct RecordingHost {
    pub state: BarState,
    pub printed: Vec<String>,
    pub spawned: Vec<String>,
    pub messages: Vec<(String, Vec<i64>)>,
    pub raised: usize,
    pub lowered: usize,
}

impl RecordingHost {
    pub fn new(lines: usize) -> Self {
        let slave = SlaveWindow {
            mapped: false,
            ..SlaveWindow::default()
        };
        Self {
            state: BarState::new(TitleWindow::default(), slave, lines),
            printed: Vec::new(),
            spawned: Vec::new(),
            messages: Vec::new(),
            raised: 0,
            lowered: 0,
        }
    }

    pub fn menu(lines: usize, rows: &[&str]) -> Self {
        let mut host = Self::new(lines);
        host.state.slave.menu = true;
        for row in rows {
            host.state.record_line(*row);
        }
        host
    }
}

impl ActionHost for RecordingHost {
    fn state(&mut self) -> &mut BarState {
        &mut self.state
    }
    fn print_line(&mut self, text: &str) {
        self.printed.push(text.to_string());
    }
    fn spawn(&mut self, command: &str) {
        self.spawned.push(command.to_string());
    }
    fn send_message(&mut self, name: &str, data: &[i64]) {
        self.messages.push((name.to_string(), data.to_vec()));
    }
    fn raise(&mut self) {
        self.raised += 1;
    }
    fn lower(&mut self) {
        self.lowered += 1;
    }
}

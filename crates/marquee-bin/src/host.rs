//! `ActionHost` for the running bar: stdout for printed lines, `sh -c` for commands.

use core_actions::ActionHost;
use core_state::BarState;
use std::io::Write;
use std::process::Stdio;
use tracing::{debug, trace, warn};

/// Fire-and-forget command launcher.
pub trait Spawner {
    fn spawn(&mut self, command: &str);
}

/// Runs commands through `sh -c` on the tokio runtime. Each child is awaited by its own
/// task so it never lingers as a zombie; its stdout is ours, its stdin and stderr are closed
/// so diagnostics never land on the rows the bar paints.
#[derive(Debug, Default)]
pub struct ShellSpawner;

fn shell_command(command: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

impl Spawner for ShellSpawner {
    fn spawn(&mut self, command: &str) {
        let child = shell_command(command).spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(err) => {
                warn!(target: "runtime.spawn", command, %err, "spawn_failed");
                return;
            }
        };
        let pid = child.id();
        debug!(target: "runtime.spawn", command, ?pid, "child_spawned");
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => trace!(target: "runtime.spawn", ?pid, %status, "child_reaped"),
                Err(err) => warn!(target: "runtime.spawn", ?pid, %err, "child_wait_failed"),
            }
        });
    }
}

/// Borrowed view handed to `EventTable::dispatch` for one chain.
pub struct LoopHost<'a, O: Write, S: Spawner> {
    pub state: &'a mut BarState,
    pub out: &'a mut O,
    pub spawner: &'a mut S,
}

impl<O: Write, S: Spawner> ActionHost for LoopHost<'_, O, S> {
    fn state(&mut self) -> &mut BarState {
        self.state
    }

    fn print_line(&mut self, text: &str) {
        let written = writeln!(self.out, "{text}").and_then(|_| self.out.flush());
        if let Err(err) = written {
            warn!(target: "runtime.output", %err, "print_failed");
        }
    }

    fn spawn(&mut self, command: &str) {
        self.spawner.spawn(command);
    }

    fn raise(&mut self) {
        trace!(target: "runtime.output", "raise_ignored");
    }

    fn lower(&mut self) {
        trace!(target: "runtime.output", "lower_ignored");
    }
}

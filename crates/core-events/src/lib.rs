//! Core event types and channel helpers for marquee.
//!
//! Two families of "event" live here:
//! * `EventId`: the symbolic identifiers that action chains are bound to
//!   (`button1`, `entertitle`, `key_Return`, ...). See `event_id`.
//! * `Event`: runtime messages travelling over the bounded channel from the
//!   async sources (stdin lines, terminal input, signals) to the single event loop
//!   task that owns all render and scroll state.

use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

pub mod event_id;
pub mod keysym;
mod sources;

pub use event_id::{EVENT_NAMES, EventId, KEY_MARKER, MAX_BUTTON, resolve_event_id};
pub use sources::{SignalSource, StdinLineSource};

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// Every producer pushes into one bounded mpsc channel consumed by the event loop. The loop is the
// only place that touches the event table, the line ring and the canvas, which serializes all
// mutation without locks. Producers await on a full channel instead of dropping events: a status
// bar would rather render a line late than lose it.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

// Counters read by the shutdown log.
pub static SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static LINES_RECEIVED: AtomicU64 = AtomicU64::new(0);
pub static SIGNALS_RECEIVED: AtomicU64 = AtomicU64::new(0);

/// Top-level message consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    /// One line of markup text read from the input stream (newline stripped).
    Line(String),
    /// The input stream reached end of file.
    InputClosed,
    Signal(SignalKind),
    Shutdown,
}

/// Screen region under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Title,
    /// Visible slave row (0-based, relative to the first visible line).
    Slave(usize),
    Outside,
}

impl Target {
    pub fn is_slave(self) -> bool {
        matches!(self, Target::Slave(_))
    }
}

/// Normalized pointer/keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer button released over `target` (1-based button number).
    Button { button: u8, target: Target },
    /// Pointer moved from one region into another.
    Crossing { from: Target, to: Target },
    /// Key press already translated to a keysym.
    Key(u32),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Usr1,
    Usr2,
    Term,
}

impl SignalKind {
    /// Event dispatched when the signal arrives.
    pub fn event(self) -> EventId {
        match self {
            SignalKind::Usr1 => EventId::SigUsr1,
            SignalKind::Usr2 => EventId::SigUsr2,
            SignalKind::Term => EventId::OnExit,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Producers
// -------------------------------------------------------------------------------------------------

/// A background producer feeding the event loop. `launch` consumes the source and starts its
/// task; the task ends on its own once a send fails or `tx.closed()` resolves.
pub trait EventSource: Send + 'static {
    /// Stable label for logs.
    fn label(&self) -> &'static str;
    fn launch(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Producers collected at startup and launched together.
#[derive(Default)]
pub struct SourceSet {
    pending: Vec<Box<dyn EventSource>>,
}

impl SourceSet {
    pub fn with(mut self, source: impl EventSource) -> Self {
        self.pending.push(Box::new(source));
        self
    }

    pub fn with_if(self, enabled: bool, source: impl EventSource) -> Self {
        if enabled { self.with(source) } else { self }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.pending.iter().map(|s| s.label()).collect()
    }

    /// Start every producer with its own sender clone.
    pub fn launch(self, tx: &Sender<Event>) -> RunningSources {
        let tasks = self
            .pending
            .into_iter()
            .map(|source| {
                let label = source.label();
                tracing::debug!(target: "runtime.events", source = label, "source_launched");
                (label, source.launch(tx.clone()))
            })
            .collect();
        RunningSources { tasks }
    }
}

/// Join handles of launched producers.
pub struct RunningSources {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl RunningSources {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Abort producers that are still running. A stdin read in flight is not cancellable, so
    /// this only guarantees no further events get queued by the aborted tasks.
    pub fn abort_all(self) {
        for (label, task) in self.tasks {
            if !task.is_finished() {
                tracing::trace!(target: "runtime.events", source = label, "source_aborted");
                task.abort();
            }
        }
    }

    /// Wait for every producer to finish on its own.
    pub async fn join(self) -> Vec<(&'static str, bool)> {
        let mut out = Vec::with_capacity(self.tasks.len());
        for (label, task) in self.tasks {
            out.push((label, task.await.is_ok()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::{mpsc, oneshot};

    struct Greeter;

    impl EventSource for Greeter {
        fn label(&self) -> &'static str {
            "greeter"
        }
        fn launch(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            tokio::spawn(async move {
                let _ = tx.send(Event::Line("hello".into())).await;
            })
        }
    }

    /// Reports through `done` once it notices the loop went away.
    struct Watcher {
        done: oneshot::Sender<()>,
    }

    impl EventSource for Watcher {
        fn label(&self) -> &'static str {
            "watcher"
        }
        fn launch(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            let done = self.done;
            tokio::spawn(async move {
                tx.closed().await;
                let _ = done.send(());
            })
        }
    }

    #[tokio::test]
    async fn launched_sources_feed_the_channel() {
        let (tx, mut rx) = mpsc::channel::<Event>(4);
        let set = SourceSet::default().with(Greeter).with_if(false, Greeter);
        assert_eq!(set.labels(), vec!["greeter"]);
        let running = set.launch(&tx);
        assert_eq!(running.len(), 1);

        let got = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert_eq!(got.ok().flatten(), Some(Event::Line("hello".into())));
        assert_eq!(running.join().await, vec![("greeter", true)]);
    }

    #[tokio::test]
    async fn sources_notice_a_closed_loop() {
        let (tx, rx) = mpsc::channel::<Event>(4);
        let (done_tx, done_rx) = oneshot::channel();
        let running = SourceSet::default()
            .with(Watcher { done: done_tx })
            .launch(&tx);
        drop(tx);
        drop(rx);

        let noticed = tokio::time::timeout(Duration::from_millis(200), done_rx).await;
        assert!(matches!(noticed, Ok(Ok(()))));
        running.abort_all();
    }

    #[test]
    fn signal_kinds_map_to_events() {
        assert_eq!(SignalKind::Usr1.event(), EventId::SigUsr1);
        assert_eq!(SignalKind::Usr2.event(), EventId::SigUsr2);
        assert_eq!(SignalKind::Term.event(), EventId::OnExit);
    }
}

use crate::key_map::map_key_event;
use crate::pointer::{PointerLayout, button_number};
use crate::{KEYS_FORWARDED, POINTER_EVENTS, PUMP_STARTS, PUMP_STOPS};
use core_events::{SEND_FAILURES, Event, InputEvent, Target};
use crossterm::event::{
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEvent as CKeyEvent,
    KeyModifiers as CKeyModifiers, MouseEvent as CMouseEvent, MouseEventKind as CMouseKind,
};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender, watch};
use tokio::task;
use tokio_stream::{Stream, StreamExt};
use tracing::{Instrument, debug, info, trace, warn};

/// Handle asking the input task to stop at its next await point.
#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

fn stop_pair() -> (AsyncInputShutdown, Arc<Notify>) {
    let notify = Arc::new(Notify::new());
    (
        AsyncInputShutdown {
            notify: Arc::clone(&notify),
        },
        notify,
    )
}

/// Spawn a Tokio task translating the crossterm `EventStream` into bar input events.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
    layout: watch::Receiver<PointerLayout>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, stop) = stop_pair();
    let pump = InputPump::new(sender, EventStream::new(), stop, layout);
    let handle = task::spawn(
        pump.run()
            .instrument(tracing::debug_span!(target: "input.thread", "input_pump")),
    );
    (handle, shutdown)
}

/// Why the pump loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopReason {
    Requested,
    ReceiverGone,
    TerminalClosed,
    TerminalError(io::ErrorKind),
}

impl StopReason {
    fn label(self) -> &'static str {
        match self {
            StopReason::Requested => "requested",
            StopReason::ReceiverGone => "receiver_gone",
            StopReason::TerminalClosed => "terminal_closed",
            StopReason::TerminalError(_) => "terminal_error",
        }
    }
}

struct InputPump<S> {
    sender: Sender<Event>,
    terminal: S,
    stop: Arc<Notify>,
    layout: watch::Receiver<PointerLayout>,
    /// Region the pointer was last seen in.
    hover: Target,
}

impl<S> InputPump<S>
where
    S: Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(
        sender: Sender<Event>,
        terminal: S,
        stop: Arc<Notify>,
        layout: watch::Receiver<PointerLayout>,
    ) -> Self {
        Self {
            sender,
            terminal,
            stop,
            layout,
            hover: Target::Outside,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "input_pump_started");
        PUMP_STARTS.fetch_add(1, Ordering::Relaxed);
        let reason = self.pump().await;
        PUMP_STOPS.fetch_add(1, Ordering::Relaxed);
        if let StopReason::TerminalError(kind) = reason {
            warn!(target: "input.thread", error_kind = ?kind, "input_pump_terminal_error");
        }
        info!(target: "input.thread", reason = reason.label(), "input_pump_stopped");
    }

    async fn pump(&mut self) -> StopReason {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.stop.notified() => return StopReason::Requested,
                next = self.terminal.next() => next,
            };
            let delivered = match next {
                None => return StopReason::TerminalClosed,
                Some(Err(err)) => return StopReason::TerminalError(err.kind()),
                Some(Ok(CEvent::Key(key))) => self.on_key(key).await,
                Some(Ok(CEvent::Mouse(mouse))) => self.on_mouse(mouse).await,
                Some(Ok(CEvent::FocusLost)) => self.cross_to(Target::Outside).await,
                Some(Ok(CEvent::Resize(columns, rows))) => {
                    trace!(target: "input.event", columns, rows, "resize");
                    self.forward(Event::Input(InputEvent::Resize(columns, rows)))
                        .await
                }
                Some(Ok(_)) => true,
            };
            if !delivered {
                return StopReason::ReceiverGone;
            }
        }
    }

    async fn on_key(&mut self, key: CKeyEvent) -> bool {
        // Raw mode swallows SIGINT; treat Ctrl-C as a shutdown request instead.
        if matches!(key.code, CKeyCode::Char('c')) && key.modifiers.contains(CKeyModifiers::CONTROL)
        {
            debug!(target: "input.event", "ctrl_c");
            return self.forward(Event::Shutdown).await;
        }
        let Some(sym) = map_key_event(&key) else {
            return true;
        };
        trace!(target: "input.event", sym, "key");
        let sent = self.forward(Event::Input(InputEvent::Key(sym))).await;
        if sent {
            KEYS_FORWARDED.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }

    async fn on_mouse(&mut self, mouse: CMouseEvent) -> bool {
        POINTER_EVENTS.fetch_add(1, Ordering::Relaxed);
        let target = self.layout.borrow().target_at(mouse.column, mouse.row);
        if !self.cross_to(target).await {
            return false;
        }
        let button = match mouse.kind {
            CMouseKind::Up(b) => button_number(b),
            CMouseKind::ScrollUp => 4,
            CMouseKind::ScrollDown => 5,
            CMouseKind::ScrollLeft => 6,
            CMouseKind::ScrollRight => 7,
            CMouseKind::Down(_) | CMouseKind::Drag(_) | CMouseKind::Moved => return true,
        };
        trace!(target: "input.event", button, ?target, "button");
        self.forward(Event::Input(InputEvent::Button { button, target }))
            .await
    }

    // Report a region change; no event when the pointer stays in the same region.
    async fn cross_to(&mut self, to: Target) -> bool {
        if to == self.hover {
            return true;
        }
        let from = std::mem::replace(&mut self.hover, to);
        trace!(target: "input.event", ?from, ?to, "crossing");
        self.forward(Event::Input(InputEvent::Crossing { from, to }))
            .await
    }

    async fn forward(&self, event: Event) -> bool {
        let sent = self.sender.send(event).await.is_ok();
        if !sent {
            SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }
}

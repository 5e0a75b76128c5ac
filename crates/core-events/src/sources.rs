//! Built-in event sources: the markup line stream and Unix signals.

use crate::{Event, EventSource, LINES_RECEIVED, SEND_FAILURES, SIGNALS_RECEIVED, SignalKind};
use std::sync::atomic::Ordering;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::signal::unix::{Signal, SignalKind as UnixSignal, signal};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Reads newline-delimited markup lines and forwards each as `Event::Line`.
/// End of input is reported once as `Event::InputClosed`.
pub struct StdinLineSource<R = tokio::io::Stdin> {
    reader: R,
}

impl StdinLineSource {
    pub fn stdin() -> Self {
        Self {
            reader: tokio::io::stdin(),
        }
    }
}

impl<R> StdinLineSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Read from an arbitrary async reader (tests, named pipes).
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> EventSource for StdinLineSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    fn label(&self) -> &'static str {
        "stdin_lines"
    }

    fn launch(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut lines = BufReader::new(self.reader).lines();
            loop {
                let next = match lines.next_line().await {
                    Ok(Some(line)) => {
                        LINES_RECEIVED.fetch_add(1, Ordering::Relaxed);
                        Event::Line(line)
                    }
                    Ok(None) => {
                        info!(target: "runtime.events", "input_eof");
                        Event::InputClosed
                    }
                    Err(err) => {
                        warn!(target: "runtime.events", ?err, "input_read_error");
                        Event::InputClosed
                    }
                };
                let closed = next == Event::InputClosed;
                if tx.send(next).await.is_err() {
                    SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                    break;
                }
                if closed {
                    break;
                }
            }
        })
    }
}

/// Forwards the requested Unix signals as `Event::Signal`.
pub struct SignalSource {
    kinds: Vec<SignalKind>,
}

impl SignalSource {
    pub fn new(kinds: Vec<SignalKind>) -> Self {
        Self { kinds }
    }
}

fn install(kind: SignalKind) -> Option<Signal> {
    let unix = match kind {
        SignalKind::Usr1 => UnixSignal::user_defined1(),
        SignalKind::Usr2 => UnixSignal::user_defined2(),
        SignalKind::Term => UnixSignal::terminate(),
    };
    match signal(unix) {
        Ok(s) => Some(s),
        Err(err) => {
            warn!(target: "runtime.events", ?kind, ?err, "signal_hook_failed");
            None
        }
    }
}

async fn recv(sig: &mut Option<Signal>) -> Option<()> {
    match sig {
        Some(s) => s.recv().await,
        None => std::future::pending().await,
    }
}

impl EventSource for SignalSource {
    fn label(&self) -> &'static str {
        "signals"
    }

    fn launch(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let wanted = |kind: SignalKind| {
            if self.kinds.contains(&kind) {
                install(kind)
            } else {
                None
            }
        };
        let mut usr1 = wanted(SignalKind::Usr1);
        let mut usr2 = wanted(SignalKind::Usr2);
        let mut term = wanted(SignalKind::Term);
        tokio::spawn(async move {
            if usr1.is_none() && usr2.is_none() && term.is_none() {
                return;
            }
            loop {
                let (kind, got) = tokio::select! {
                    got = recv(&mut usr1) => (SignalKind::Usr1, got),
                    got = recv(&mut usr2) => (SignalKind::Usr2, got),
                    got = recv(&mut term) => (SignalKind::Term, got),
                    _ = tx.closed() => break,
                };
                if got.is_none() {
                    debug!(target: "runtime.events", ?kind, "signal_stream_closed");
                    break;
                }
                SIGNALS_RECEIVED.fetch_add(1, Ordering::Relaxed);
                debug!(target: "runtime.events", ?kind, "signal");
                if tx.send(Event::Signal(kind)).await.is_err() {
                    SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                    break;
                }
            }
        })
    }
}

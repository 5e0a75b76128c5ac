//! marquee entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::{EventTable, build_table};
use core_config::{Config, ConfigContext, Geometry, Overrides, StyleConfig, load_from};
use core_events::{
    EVENT_CHANNEL_CAP, Event, RunningSources, SignalKind, SignalSource, SourceSet, StdinLineSource,
};
use core_render::{BarRenderer, Color, Theme};
use core_state::{BarState, SlaveWindow, TitleWindow};
use core_terminal::{TerminalCanvas, TerminalCapabilities, TerminalSession};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod display;
mod host;
mod runtime;

use display::{pointer_layout, slot_layout};
use host::ShellSpawner;
use runtime::{BarRuntime, LoopControl, ShutdownReason};

const LOG_FILE: &str = "marquee.log";

/// CLI arguments. Every flag overrides the matching `marquee.toml` value.
#[derive(Parser, Debug)]
#[command(name = "marquee", version, about = "Markup-driven status bar for the terminal")]
struct Args {
    /// Configuration file path (overrides discovery of `marquee.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Event/action specification, e.g. `button1=exec:xterm;button3=exit`.
    #[arg(short = 'e', long = "actions")]
    actions: Option<String>,
    /// Number of slave lines (0 disables the slave window).
    #[arg(short = 'l', long = "lines")]
    lines: Option<usize>,
    /// Title width in cells (0 spans to the right edge).
    #[arg(short = 'w', long = "width")]
    width: Option<u32>,
    /// Title column; negative counts from the right edge.
    #[arg(short = 'x', allow_negative_numbers = true)]
    x: Option<i32>,
    /// Title row; negative counts from the bottom edge.
    #[arg(short = 'y', allow_negative_numbers = true)]
    y: Option<i32>,
    /// Title alignment: l, c or r.
    #[arg(long = "ta")]
    title_align: Option<String>,
    /// Slave alignment: l, c or r.
    #[arg(long = "sa")]
    slave_align: Option<String>,
    /// Auto-resize the title towards l(eft) or r(ight).
    #[arg(long = "expand")]
    expand: Option<String>,
    /// Menu mode; `h` lays the rows out horizontally.
    #[arg(short = 'm', long = "menu", num_args = 0..=1, default_missing_value = "v")]
    menu: Option<String>,
    /// Keep running after input ends.
    #[arg(short = 'p', long = "persistent")]
    persistent: bool,
    #[arg(long = "fg")]
    fg: Option<String>,
    #[arg(long = "bg")]
    bg: Option<String>,
    /// Rows per rendered line.
    #[arg(long = "line-height")]
    line_height: Option<u16>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            title_align: self.title_align.clone(),
            slave_align: self.slave_align.clone(),
            width: self.width,
            x: self.x,
            y: self.y,
            lines: self.lines,
            expand: self.expand.clone(),
            menu: self.menu.is_some(),
            horizontal: self.menu.as_deref().is_some_and(|m| m.starts_with('h')),
            persistent: self.persistent,
            fg: self.fg.clone(),
            bg: self.bg.clone(),
            line_height: self.line_height,
            actions: self.actions.clone(),
        }
    }
}

/// Route tracing into a fresh `marquee.log` in the working directory. The terminal belongs
/// to the bar, so nothing is logged to stderr. `RUST_LOG` selects targets.
fn init_logging() -> Option<WorkerGuard> {
    let dir = Path::new(".");
    // Each run starts a new log; a stale file is not an error.
    let _ = std::fs::remove_file(dir.join(LOG_FILE));
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .ok()
        .map(|()| guard)
}

/// Panics land in the log before the default hook prints them.
fn log_panics() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!(target: "runtime.panic", %info, "panicked");
            previous(info);
        }));
    });
}

fn parse_color(spec: Option<&str>, fallback: Color) -> Color {
    let Some(spec) = spec else {
        return fallback;
    };
    Color::parse(spec).unwrap_or_else(|err| {
        warn!(target: "config", spec, %err, "color_fallback");
        fallback
    })
}

fn theme_from(style: &StyleConfig) -> Theme {
    let defaults = Theme::default();
    Theme {
        fg: parse_color(style.fg.as_deref(), defaults.fg),
        bg: parse_color(style.bg.as_deref(), defaults.bg),
    }
}

/// Bar state for the resolved geometry. A vertical slave starts collapsed; a horizontal
/// menu cannot collapse, so it starts shown.
fn initial_state(config: &Config, geometry: &Geometry) -> BarState {
    let slave = &config.file.slave;
    let title = TitleWindow {
        x: geometry.x,
        y: geometry.y,
        width: geometry.title_width,
        align: config.title_align(),
        expand: config.expand(),
        hidden: false,
    };
    let slave_window = SlaveWindow {
        width: geometry.slave_width,
        align: config.slave_align(),
        menu: slave.menu,
        horizontal: slave.horizontal,
        sticky: false,
        persistent: slave.persistent,
        mapped: slave.horizontal && geometry.lines > 0,
    };
    BarState::new(title, slave_window, geometry.lines)
}

/// Signals worth hooking: only those whose event has a binding.
fn bound_signals(table: &EventTable) -> Vec<SignalKind> {
    [SignalKind::Usr1, SignalKind::Usr2, SignalKind::Term]
        .into_iter()
        .filter(|kind| table.lookup(kind.event()))
        .collect()
}

/// Stop the input pump (bounded wait), abort the line and signal producers, and log what
/// the producers saw over the session.
async fn stop_tasks(
    reason: ShutdownReason,
    sources: RunningSources,
    input_task: JoinHandle<()>,
    input_shutdown: core_input::AsyncInputShutdown,
) {
    input_shutdown.signal();
    match tokio::time::timeout(Duration::from_millis(200), input_task).await {
        Ok(Ok(())) => trace!(target: "runtime.shutdown", "input_joined"),
        Ok(Err(err)) => error!(target: "runtime.shutdown", %err, "input_join_failed"),
        Err(_) => warn!(target: "runtime.shutdown", "input_join_timed_out"),
    }
    sources.abort_all();
    info!(
        target: "runtime.shutdown",
        reason = %reason,
        lines = core_events::LINES_RECEIVED.load(Ordering::Relaxed),
        signals = core_events::SIGNALS_RECEIVED.load(Ordering::Relaxed),
        keys = core_input::KEYS_FORWARDED.load(Ordering::Relaxed),
        pointer = core_input::POINTER_EVENTS.load(Ordering::Relaxed),
        dropped_sends = core_events::SEND_FAILURES.load(Ordering::Relaxed),
        "shutdown_complete"
    );
}

async fn run(args: Args) -> Result<i32> {
    let mut config = load_from(args.config.clone())?;
    config.apply_overrides(args.overrides());

    let mut session = TerminalSession::new();
    let (columns, rows) = session.size()?;
    let geometry = config.apply_context(ConfigContext::new(columns, rows));
    let theme = theme_from(&config.file.style);
    let state = initial_state(&config, &geometry);
    let table = build_table(config.actions());
    info!(
        target: "runtime.startup",
        columns,
        rows,
        lines = geometry.lines,
        bindings = table.len(),
        "bootstrap_complete"
    );

    let _terminal = session.enter()?;
    let layout = slot_layout(&geometry, state.slave.horizontal);
    let canvas = TerminalCanvas::new(
        std::io::stderr(),
        columns,
        rows,
        layout,
        theme,
        TerminalCapabilities::detect(),
    );
    let (layout_tx, layout_rx) = watch::channel(pointer_layout(&layout, state.slave.mapped));

    let (tx, mut rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let signals = bound_signals(&table);
    let sources = SourceSet::default()
        .with(StdinLineSource::stdin())
        .with_if(!signals.is_empty(), SignalSource::new(signals))
        .launch(&tx);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx, layout_rx);

    let mut runtime = BarRuntime::new(
        state,
        table,
        config,
        BarRenderer::new(theme),
        canvas,
        std::io::stdout(),
        ShellSpawner,
        layout_tx,
    );

    let reason = async {
        if let LoopControl::Break(reason) = runtime.start() {
            return reason;
        }
        while let Some(event) = rx.recv().await {
            if let LoopControl::Break(reason) = runtime.handle(event) {
                return reason;
            }
        }
        ShutdownReason::ChannelClosed
    }
    .instrument(tracing::debug_span!(target: "runtime", "event_loop"))
    .await;

    debug!(target: "runtime.shutdown", reason = %reason, "shutdown_started");
    runtime.finish(reason);
    rx.close();
    stop_tasks(reason, sources, input_task, input_shutdown).await;
    Ok(runtime.exit_code())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_guard = init_logging();
    log_panics();
    info!(target: "runtime", version = env!("CARGO_PKG_VERSION"), "startup");

    let code = run(args).await?;
    info!(target: "runtime", code, "exit");
    drop(log_guard);
    // The stdin reader thread may still be parked in a read; do not wait for it.
    std::process::exit(code)
}

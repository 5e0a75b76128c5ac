//! The event loop body: one owner for bar state, the event table and the display.
//!
//! Design invariants:
//! * Every `Event` is handled to completion (routing, dispatch, repaint, commit) before the
//!   next one is received, so actions always see the state the previous event left.
//! * Repaints are driven by comparing a `FrameSnapshot` taken before the event with the
//!   state after it; handlers only mark what they know changed.
//! * `onexit` runs exactly once, when the loop stops for any reason.

use core_actions::{DispatchResult, EventTable};
use core_config::{Config, ConfigContext, Geometry};
use core_events::{Event, EventId, InputEvent, SignalKind, Target};
use core_input::PointerLayout;
use core_render::{BarRenderer, Route, route_line};
use core_state::{BarState, ScrollWindow};
use std::fmt;
use std::io::Write;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::display::{Display, pointer_layout, slot_layout};
use crate::host::{LoopHost, Spawner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// An `exit` action cleared the run flag.
    ActionExit,
    InputClosed,
    Interrupt,
    Terminated,
    ChannelClosed,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::ActionExit => "action_exit",
            ShutdownReason::InputClosed => "input_closed",
            ShutdownReason::Interrupt => "interrupt",
            ShutdownReason::Terminated => "terminated",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break(ShutdownReason),
}

// Visible properties that decide what needs repainting after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameSnapshot {
    hidden: bool,
    mapped: bool,
    selected: Option<usize>,
}

impl FrameSnapshot {
    fn capture(state: &BarState) -> Self {
        Self {
            hidden: state.title.hidden,
            mapped: state.slave.mapped,
            selected: state.scroll.selected_row(),
        }
    }
}

pub struct BarRuntime<D: Display, O: Write, S: Spawner> {
    state: BarState,
    table: EventTable,
    config: Config,
    renderer: BarRenderer,
    display: D,
    out: O,
    spawner: S,
    layout_tx: watch::Sender<PointerLayout>,
    title_text: String,
    title_dirty: bool,
    lines_seen: u64,
}

impl<D: Display, O: Write, S: Spawner> BarRuntime<D, O, S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: BarState,
        table: EventTable,
        config: Config,
        renderer: BarRenderer,
        display: D,
        out: O,
        spawner: S,
        layout_tx: watch::Sender<PointerLayout>,
    ) -> Self {
        Self {
            state,
            table,
            config,
            renderer,
            display,
            out,
            spawner,
            layout_tx,
            title_text: String::new(),
            title_dirty: true,
            lines_seen: 0,
        }
    }

    pub fn state(&self) -> &BarState {
        &self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn exit_code(&self) -> i32 {
        self.state.run.exit_code
    }

    /// Paint the empty bar, then run `onstart`.
    pub fn start(&mut self) -> LoopControl {
        self.state.body_dirty = true;
        let before = FrameSnapshot::capture(&self.state);
        let result = self.dispatch(EventId::OnStart);
        self.finish_cycle(before, result, ShutdownReason::ActionExit)
    }

    pub fn handle(&mut self, event: Event) -> LoopControl {
        let before = FrameSnapshot::capture(&self.state);
        let (result, reason) = match event {
            Event::Line(line) => (self.handle_line(&line), ShutdownReason::ActionExit),
            Event::Input(input) => (self.handle_input(input), ShutdownReason::ActionExit),
            Event::InputClosed => (self.handle_input_closed(), ShutdownReason::InputClosed),
            Event::Signal(kind) => self.handle_signal(kind),
            Event::Shutdown => {
                self.state.run.running = false;
                (DispatchResult::clean(), ShutdownReason::Interrupt)
            }
        };
        self.finish_cycle(before, result, reason)
    }

    /// Run `onexit` and push the final frame.
    pub fn finish(&mut self, reason: ShutdownReason) {
        info!(
            target: "runtime",
            %reason,
            lines = self.lines_seen,
            rendered = core_render::timing::lines_rendered(),
            last_line_ns = core_render::timing::last_line_ns(),
            "loop_finished"
        );
        if reason != ShutdownReason::Terminated {
            self.dispatch(EventId::OnExit);
        }
        if let Err(err) = self.display.commit() {
            warn!(target: "runtime", %err, "final_commit_failed");
        }
        self.table.teardown();
    }

    fn dispatch(&mut self, event: EventId) -> DispatchResult {
        let mut host = LoopHost {
            state: &mut self.state,
            out: &mut self.out,
            spawner: &mut self.spawner,
        };
        self.table.dispatch(event, &mut host)
    }

    fn handle_line(&mut self, line: &str) -> DispatchResult {
        let first = self.lines_seen == 0;
        self.lines_seen += 1;
        match route_line(line, first, self.state.has_lines()) {
            Route::Title(text) => {
                self.title_text = text.to_string();
                self.title_dirty = true;
            }
            Route::Clear => self.state.clear_lines(),
            Route::Body(text) => self.state.record_line(text),
        }
        self.dispatch(EventId::OnNewInput)
    }

    fn handle_input_closed(&mut self) -> DispatchResult {
        if self.state.slave.persistent {
            info!(target: "runtime", "input_closed_persistent");
        } else {
            self.state.run.running = false;
        }
        DispatchResult::clean()
    }

    fn handle_signal(&mut self, kind: SignalKind) -> (DispatchResult, ShutdownReason) {
        debug!(target: "runtime", ?kind, "signal");
        let result = self.dispatch(kind.event());
        if kind == SignalKind::Term {
            self.state.run.running = false;
            return (result, ShutdownReason::Terminated);
        }
        (result, ShutdownReason::ActionExit)
    }

    fn handle_input(&mut self, input: InputEvent) -> DispatchResult {
        match input {
            InputEvent::Button { button, target } => self.handle_button(button, target),
            InputEvent::Crossing { from, to } => self.handle_crossing(from, to),
            InputEvent::Key(sym) => {
                if self.state.grabs.keys {
                    self.dispatch(EventId::Key(sym))
                } else {
                    trace!(target: "runtime", sym, "key_not_grabbed");
                    DispatchResult::clean()
                }
            }
            InputEvent::Resize(columns, rows) => {
                self.resize(columns, rows);
                DispatchResult::dirty()
            }
        }
    }

    fn handle_button(&mut self, button: u8, target: Target) -> DispatchResult {
        if target == Target::Outside && !self.state.grabs.mouse {
            return DispatchResult::clean();
        }
        if let Target::Slave(row) = target
            && self.state.slave.menu
        {
            self.state.scroll.select(Some(row));
        }
        match EventId::button(button) {
            Some(event) => self.dispatch(event),
            None => DispatchResult::clean(),
        }
    }

    fn handle_crossing(&mut self, from: Target, to: Target) -> DispatchResult {
        if self.state.slave.menu {
            self.state.scroll.select(match to {
                Target::Slave(row) => Some(row),
                _ => None,
            });
        }
        let mut result = DispatchResult::clean();
        if from == Target::Title && to != Target::Title {
            result = result.merge(self.dispatch(EventId::LeaveTitle));
        }
        if from.is_slave() && !to.is_slave() {
            result = result.merge(self.dispatch(EventId::LeaveSlave));
        }
        if to == Target::Title && from != Target::Title {
            result = result.merge(self.dispatch(EventId::EnterTitle));
        }
        if to.is_slave() && !from.is_slave() {
            result = result.merge(self.dispatch(EventId::EnterSlave));
        }
        result
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        if let Some(geometry) = self.config.recompute_with_context(ConfigContext::new(columns, rows)) {
            info!(target: "runtime", columns, rows, lines = geometry.lines, "geometry_changed");
            self.adopt_geometry(geometry);
        }
        let layout = slot_layout(&self.config.effective, self.state.slave.horizontal);
        self.display.relayout(columns, rows, layout);
        self.title_dirty = true;
        self.state.body_dirty = true;
    }

    fn adopt_geometry(&mut self, geometry: Geometry) {
        self.state.title.x = geometry.x;
        self.state.title.y = geometry.y;
        self.state.title.width = geometry.title_width;
        self.state.slave.width = geometry.slave_width;
        if geometry.lines != self.state.max_lines() {
            self.state.scroll = ScrollWindow::new(geometry.lines);
            self.state.scroll.settle(self.state.ring.len());
            if geometry.lines == 0 {
                self.state.slave.mapped = false;
            }
        }
    }

    fn finish_cycle(
        &mut self,
        before: FrameSnapshot,
        result: DispatchResult,
        reason: ShutdownReason,
    ) -> LoopControl {
        let after = FrameSnapshot::capture(&self.state);
        if after.hidden != before.hidden {
            self.title_dirty = true;
        }
        if after.mapped != before.mapped || after.selected != before.selected {
            self.state.body_dirty = true;
        }
        if self.title_dirty {
            self.renderer
                .render_title(&mut self.display, &self.state.title, &self.title_text);
            self.title_dirty = false;
        }
        if self.state.body_dirty {
            self.renderer.render_body(&mut self.display, &mut self.state);
        }
        self.publish_layout();
        if let Err(err) = self.display.commit() {
            warn!(target: "runtime", %err, "commit_failed");
        }
        trace!(target: "runtime", dirty = result.dirty, quit = result.quit, "cycle_complete");

        if self.state.run.running {
            LoopControl::Continue
        } else {
            LoopControl::Break(reason)
        }
    }

    fn publish_layout(&self) {
        let layout = pointer_layout(&self.display.slot_layout(), self.state.slave.mapped);
        self.layout_tx.send_if_modified(|current| {
            let changed = *current != layout;
            *current = layout;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::tests::RecordingSpawner;
    use anyhow::Result;
    use core_actions::build_table;
    use core_render::{RecordingCanvas, Slot, Theme};
    use core_state::{SlaveWindow, TitleWindow};
    use core_terminal::SlotLayout;
    use pretty_assertions::assert_eq;

    impl Display for RecordingCanvas {
        fn relayout(&mut self, _columns: u16, _rows: u16, _layout: SlotLayout) {
            self.presented.clear();
        }

        fn slot_layout(&self) -> SlotLayout {
            SlotLayout::default()
        }

        fn commit(&mut self) -> Result<()> {
            Ok(())
        }
    }

    type TestRuntime = BarRuntime<RecordingCanvas, Vec<u8>, RecordingSpawner>;

    fn runtime(lines: usize, menu: bool, spec: Option<&str>) -> TestRuntime {
        let title = TitleWindow {
            width: 20,
            ..TitleWindow::default()
        };
        let slave = SlaveWindow {
            width: 20,
            menu,
            ..SlaveWindow::default()
        };
        let (layout_tx, _) = watch::channel(PointerLayout::default());
        BarRuntime::new(
            BarState::new(title, slave, lines),
            build_table(spec),
            Config::default(),
            BarRenderer::new(Theme::default()),
            RecordingCanvas::cells(),
            Vec::new(),
            RecordingSpawner::default(),
            layout_tx,
        )
    }

    fn line(text: &str) -> Event {
        Event::Line(text.to_string())
    }

    fn title_text(rt: &TestRuntime) -> Vec<String> {
        rt.display()
            .last_on(Slot::Title)
            .map(|p| p.scratch.texts().iter().map(|t| t.to_string()).collect())
            .unwrap_or_default()
    }

    fn output(rt: &TestRuntime) -> String {
        String::from_utf8(rt.out.clone()).unwrap()
    }

    fn cross(from: Target, to: Target) -> Event {
        Event::Input(InputEvent::Crossing { from, to })
    }

    fn click(button: u8, target: Target) -> Event {
        Event::Input(InputEvent::Button { button, target })
    }

    #[test]
    fn onstart_runs_and_paints_empty_title() {
        let mut rt = runtime(0, false, Some("onstart=print:ready"));
        assert_eq!(rt.start(), LoopControl::Continue);
        assert_eq!(output(&rt), "ready\n");
        assert!(rt.display().last_on(Slot::Title).is_some());
    }

    #[test]
    fn first_line_is_title_then_body() {
        let mut rt = runtime(2, false, None);
        rt.start();
        rt.handle(line("head"));
        rt.handle(line("one"));
        rt.handle(line("two"));
        assert_eq!(title_text(&rt), vec!["head".to_string()]);
        assert_eq!(rt.state().ring.len(), 2);
        assert_eq!(rt.state().row_text(1), Some("two"));
    }

    #[test]
    fn clear_and_retitle_lines() {
        let mut rt = runtime(2, false, None);
        rt.handle(line("head"));
        rt.handle(line("one"));
        rt.handle(line("^cs"));
        assert!(rt.state().ring.is_empty());
        rt.handle(line("^tw()fresh"));
        assert_eq!(title_text(&rt), vec!["fresh".to_string()]);
    }

    #[test]
    fn onnewinput_fires_per_line() {
        let mut rt = runtime(0, false, Some("onnewinput=print:tick"));
        rt.handle(line("a"));
        rt.handle(line("b"));
        assert_eq!(output(&rt), "tick\ntick\n");
    }

    #[test]
    fn input_close_ends_unless_persistent() {
        let mut rt = runtime(0, false, None);
        assert_eq!(
            rt.handle(Event::InputClosed),
            LoopControl::Break(ShutdownReason::InputClosed)
        );

        let mut rt = runtime(0, false, None);
        rt.state.slave.persistent = true;
        assert_eq!(rt.handle(Event::InputClosed), LoopControl::Continue);
    }

    #[test]
    fn exit_action_sets_code_and_onexit_runs_once() {
        let mut rt = runtime(0, false, Some("button3=exit:7;onexit=print:bye"));
        let control = rt.handle(click(3, Target::Title));
        assert_eq!(control, LoopControl::Break(ShutdownReason::ActionExit));
        rt.finish(ShutdownReason::ActionExit);
        assert_eq!(rt.exit_code(), 7);
        assert_eq!(output(&rt), "bye\n");
    }

    #[test]
    fn sigterm_runs_onexit_and_stops() {
        let mut rt = runtime(0, false, Some("onexit=print:bye"));
        let control = rt.handle(Event::Signal(SignalKind::Term));
        assert_eq!(control, LoopControl::Break(ShutdownReason::Terminated));
        rt.finish(ShutdownReason::Terminated);
        assert_eq!(output(&rt), "bye\n");
    }

    #[test]
    fn usr1_dispatches_binding() {
        let mut rt = runtime(0, false, Some("sigusr1=print:usr1"));
        assert_eq!(rt.handle(Event::Signal(SignalKind::Usr1)), LoopControl::Continue);
        assert_eq!(output(&rt), "usr1\n");
    }

    #[test]
    fn crossing_dispatches_enter_and_leave_pairs() {
        let mut rt = runtime(
            2,
            false,
            Some("entertitle=print:et;leavetitle=print:lt;enterslave=print:es;leaveslave=print:ls"),
        );
        rt.handle(cross(Target::Outside, Target::Title));
        rt.handle(cross(Target::Title, Target::Slave(0)));
        rt.handle(cross(Target::Slave(0), Target::Slave(1)));
        rt.handle(cross(Target::Slave(1), Target::Outside));
        assert_eq!(output(&rt), "et\nlt\nes\nls\n");
    }

    #[test]
    fn default_bindings_uncollapse_on_title_and_collapse_on_leave() {
        let mut rt = runtime(2, false, None);
        rt.handle(line("head"));
        rt.handle(line("body"));
        assert!(!rt.state().slave.mapped);
        rt.handle(cross(Target::Outside, Target::Title));
        assert!(rt.state().slave.mapped);
        assert!(rt.display().last_on(Slot::Line(0)).is_some());
        rt.handle(cross(Target::Title, Target::Slave(0)));
        rt.handle(cross(Target::Slave(0), Target::Outside));
        assert!(!rt.state().slave.mapped);
        assert!(rt.display().hidden.contains(&Slot::Line(0)));
    }

    #[test]
    fn menu_click_executes_plain_row_text() {
        let mut rt = runtime(3, true, None);
        rt.handle(line("head"));
        rt.handle(line("^fg(red)xterm"));
        rt.handle(line("top"));
        rt.handle(click(1, Target::Slave(1)));
        assert_eq!(rt.spawner.commands, vec!["top".to_string()]);
        assert_eq!(rt.state().scroll.selected_row(), None);
    }

    #[test]
    fn menu_hover_highlights_row() {
        let mut rt = runtime(2, true, Some("button1=menuprint"));
        rt.handle(line("head"));
        rt.handle(line("alpha"));
        rt.state.slave.mapped = true;
        rt.handle(cross(Target::Outside, Target::Slave(0)));
        assert_eq!(rt.state().scroll.selected_row(), Some(0));
        let last_fill = rt.display().fills.iter().rev().find(|(s, _)| *s == Slot::Line(0));
        assert_eq!(last_fill, Some(&(Slot::Line(0), Theme::default().fg)));
        rt.handle(click(1, Target::Slave(0)));
        assert_eq!(output(&rt), "alpha\n");
    }

    #[test]
    fn keys_and_outside_clicks_need_grabs() {
        let mut rt = runtime(0, false, Some("key_a=print:a;button1=print:b"));
        rt.handle(Event::Input(InputEvent::Key(0x61)));
        rt.handle(click(1, Target::Outside));
        assert_eq!(output(&rt), "");
        rt.state.grabs.keys = true;
        rt.state.grabs.mouse = true;
        rt.handle(Event::Input(InputEvent::Key(0x61)));
        rt.handle(click(1, Target::Outside));
        assert_eq!(output(&rt), "a\nb\n");
    }

    #[test]
    fn hide_toggle_hides_title_slot() {
        let mut rt = runtime(0, false, Some("button1=togglehide"));
        rt.handle(line("head"));
        rt.handle(click(1, Target::Title));
        assert!(rt.state().title.hidden);
        assert!(rt.display().hidden.contains(&Slot::Title));
    }

    #[test]
    fn shutdown_event_breaks_loop() {
        let mut rt = runtime(0, false, None);
        assert_eq!(
            rt.handle(Event::Shutdown),
            LoopControl::Break(ShutdownReason::Interrupt)
        );
    }

    #[test]
    fn shutdown_reason_labels_are_stable() {
        assert_eq!(ShutdownReason::ActionExit.as_str(), "action_exit");
        assert_eq!(ShutdownReason::InputClosed.as_str(), "input_closed");
        assert_eq!(ShutdownReason::Interrupt.as_str(), "interrupt");
        assert_eq!(ShutdownReason::Terminated.as_str(), "terminated");
        assert_eq!(ShutdownReason::ChannelClosed.to_string(), "channel_closed");
    }
}

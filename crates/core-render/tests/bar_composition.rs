use core_render::{BarRenderer, DrawOp, RecordingCanvas, Slot, Theme, row_width};
use core_state::{Align, BarState, SlaveWindow, TitleWindow};
use pretty_assertions::assert_eq;

fn bar(lines: usize) -> BarState {
    let title = TitleWindow {
        width: 40,
        align: Align::Left,
        ..TitleWindow::default()
    };
    let slave = SlaveWindow {
        width: 30,
        align: Align::Left,
        mapped: true,
        ..SlaveWindow::default()
    };
    BarState::new(title, slave, lines)
}

fn row_texts(canvas: &RecordingCanvas, row: usize) -> Vec<String> {
    canvas
        .last_on(Slot::Line(row))
        .map(|p| p.scratch.texts().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn body_shows_newest_lines() {
    let mut state = bar(3);
    for i in 0..5 {
        state.record_line(format!("l{i}"));
    }
    let mut canvas = RecordingCanvas::cells();
    BarRenderer::default().render_body(&mut canvas, &mut state);
    assert_eq!(row_texts(&canvas, 0), vec!["l2"]);
    assert_eq!(row_texts(&canvas, 1), vec!["l3"]);
    assert_eq!(row_texts(&canvas, 2), vec!["l4"]);
    assert!(!state.body_dirty);
}

#[test]
fn empty_rows_are_blanked() {
    let mut state = bar(3);
    state.record_line("only");
    let mut canvas = RecordingCanvas::cells();
    BarRenderer::default().render_body(&mut canvas, &mut state);
    assert_eq!(canvas.presented.len(), 3);
    assert_eq!(row_texts(&canvas, 0), vec!["only"]);
    assert!(row_texts(&canvas, 2).is_empty());
}

#[test]
fn scrolled_body_follows_window() {
    let mut state = bar(2);
    for i in 0..6 {
        state.record_line(format!("l{i}"));
    }
    state.scroll_home();
    let mut canvas = RecordingCanvas::cells();
    BarRenderer::default().render_body(&mut canvas, &mut state);
    assert_eq!(row_texts(&canvas, 0), vec!["l0"]);
    assert_eq!(row_texts(&canvas, 1), vec!["l1"]);
}

#[test]
fn collapsed_slave_hides_rows() {
    let mut state = bar(2);
    state.record_line("x");
    state.slave.mapped = false;
    let mut canvas = RecordingCanvas::cells();
    BarRenderer::default().render_body(&mut canvas, &mut state);
    assert!(canvas.presented.is_empty());
    assert_eq!(canvas.hidden, vec![Slot::Line(0), Slot::Line(1)]);
}

#[test]
fn menu_selection_is_reversed() {
    let theme = Theme::default();
    let mut state = bar(3);
    state.slave.menu = true;
    for i in 0..3 {
        state.record_line(format!("item{i}"));
    }
    state.scroll.select(Some(1));
    let mut canvas = RecordingCanvas::cells();
    BarRenderer::default().render_body(&mut canvas, &mut state);
    let first_op = |row| canvas.last_on(Slot::Line(row)).unwrap().scratch.ops[0].clone();
    assert_eq!(first_op(0), DrawOp::SetForeground(theme.bg));
    assert_eq!(first_op(1), DrawOp::SetForeground(theme.fg));
}

#[test]
fn hidden_title_is_not_drawn() {
    let mut state = bar(0);
    state.title.hidden = true;
    let mut canvas = RecordingCanvas::cells();
    let content = BarRenderer::default().render_title(&mut canvas, &state.title, "t");
    assert_eq!(content, 0);
    assert_eq!(canvas.hidden, vec![Slot::Title]);
    assert!(canvas.presented.is_empty());
}

#[test]
fn title_uses_its_own_width() {
    let state = bar(0);
    let mut canvas = RecordingCanvas::cells();
    BarRenderer::default().render_title(&mut canvas, &state.title, "status");
    let p = canvas.last_on(Slot::Title).unwrap();
    assert_eq!((p.scratch.width, p.dest_x), (40, 0));
}

#[test]
fn horizontal_menu_splits_width() {
    let mut state = bar(3);
    assert_eq!(row_width(&state), 30);
    state.slave.horizontal = true;
    assert_eq!(row_width(&state), 10);
}

#[test]
fn bar_without_lines_skips_body() {
    let mut state = bar(0);
    state.body_dirty = true;
    let mut canvas = RecordingCanvas::cells();
    BarRenderer::default().render_body(&mut canvas, &mut state);
    assert!(canvas.presented.is_empty());
    assert!(!state.body_dirty);
}

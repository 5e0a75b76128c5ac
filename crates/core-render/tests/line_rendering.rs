use core_render::{
    Canvas, Color, DrawOp, FontMetrics, Icon, LineRenderer, LineTarget, RecordingCanvas, Slot,
    Theme, TitleExpand,
};
use core_state::{Align, ExpandMode};
use pretty_assertions::assert_eq;

fn render(line: &str, width: i32, align: Align) -> (RecordingCanvas, i32) {
    let mut canvas = RecordingCanvas::cells();
    let content = LineRenderer::default().render(
        &mut canvas,
        line,
        LineTarget::new(Slot::Title, width, align),
    );
    (canvas, content)
}

fn ops(canvas: &RecordingCanvas) -> &[DrawOp] {
    &canvas.last().expect("line presented").scratch.ops
}

fn text_x(canvas: &RecordingCanvas) -> Vec<(i32, String)> {
    ops(canvas)
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, text, .. } => Some((*x, text.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn foreground_applies_to_following_run_and_resets() {
    let theme = Theme::default();
    let red = Color::rgb(0xff, 0, 0);
    let (canvas, content) = render("^fg(#ff0000)hello^fg()", 20, Align::Left);
    let ops = ops(&canvas);
    let text_at = ops
        .iter()
        .position(|op| matches!(op, DrawOp::Text { text, .. } if text == "hello"))
        .expect("text drawn");
    assert_eq!(ops[text_at - 1], DrawOp::SetForeground(red));
    assert_eq!(ops.last(), Some(&DrawOp::SetForeground(theme.fg)));
    assert_eq!(content, 5);
}

#[test]
fn line_starts_with_background_fill() {
    let theme = Theme::default();
    let (canvas, _) = render("x", 12, Align::Left);
    assert_eq!(
        &ops(&canvas)[..3],
        &[
            DrawOp::SetForeground(theme.bg),
            DrawOp::FillRect {
                x: 0,
                y: 0,
                w: 12,
                h: 1
            },
            DrawOp::SetForeground(theme.fg),
        ]
    );
    assert_eq!(canvas.fills, vec![(Slot::Title, theme.bg)]);
}

#[test]
fn reversed_line_swaps_colors() {
    let theme = Theme::default();
    let mut canvas = RecordingCanvas::cells();
    LineRenderer::default().render(
        &mut canvas,
        "sel",
        LineTarget::new(Slot::Line(0), 10, Align::Left).reversed(true),
    );
    assert_eq!(ops(&canvas)[0], DrawOp::SetForeground(theme.fg));
    assert_eq!(ops(&canvas)[2], DrawOp::SetForeground(theme.bg));
    assert_eq!(canvas.fills, vec![(Slot::Line(0), theme.fg)]);
}

#[test]
fn unknown_color_falls_back_to_theme() {
    let theme = Theme::default();
    let (canvas, _) = render("^fg(nosuchcolor)x", 10, Align::Left);
    assert!(ops(&canvas).contains(&DrawOp::SetForeground(theme.fg)));
    assert_eq!(text_x(&canvas), vec![(0, "x".to_string())]);
}

#[test]
fn alignment_places_content() {
    let (canvas, content) = render("abcd", 20, Align::Left);
    assert_eq!((content, canvas.last().unwrap().dest_x), (4, 0));
    let (canvas, _) = render("abcd", 20, Align::Center);
    assert_eq!(canvas.last().unwrap().dest_x, 8);
    let (canvas, _) = render("abcd", 20, Align::Right);
    assert_eq!(canvas.last().unwrap().dest_x, 16);
}

#[test]
fn overflowing_run_is_clipped_with_dots() {
    let (canvas, content) = render("hello", 4, Align::Left);
    assert_eq!(text_x(&canvas), vec![(0, "h..".to_string())]);
    assert_eq!(content, 3);
}

#[test]
fn second_run_clipped_against_cursor() {
    let (canvas, content) = render("abc^fg(red)defghij", 8, Align::Left);
    assert_eq!(
        text_x(&canvas),
        vec![(0, "abc".to_string()), (3, "d...".to_string())]
    );
    assert_eq!(content, 7);
}

#[test]
fn escaped_caret_is_literal() {
    let (canvas, content) = render("a^^b", 10, Align::Left);
    assert_eq!(
        text_x(&canvas),
        vec![(0, "a".to_string()), (1, "^b".to_string())]
    );
    assert_eq!(content, 3);
}

#[test]
fn rect_advances_cursor() {
    let (canvas, content) = render("^r(3x1)x", 20, Align::Left);
    assert!(ops(&canvas).contains(&DrawOp::FillRect {
        x: 0,
        y: 0,
        w: 3,
        h: 1
    }));
    assert_eq!(text_x(&canvas), vec![(3, "x".to_string())]);
    assert_eq!(content, 4);
}

#[test]
fn zero_width_outline_is_skipped() {
    let (canvas, content) = render("^ro(0x1)x", 20, Align::Left);
    assert!(!ops(&canvas).iter().any(|op| matches!(op, DrawOp::DrawRect { .. })));
    assert_eq!(content, 1);
}

#[test]
fn relative_and_absolute_position() {
    let (canvas, _) = render("^p(2)x", 20, Align::Left);
    assert_eq!(text_x(&canvas), vec![(2, "x".to_string())]);
    let (canvas, _) = render("ab^pa(5)x", 20, Align::Left);
    assert_eq!(text_x(&canvas)[1], (5, "x".to_string()));
    let (canvas, _) = render("ab^p(-9)x", 20, Align::Left);
    assert_eq!(text_x(&canvas)[1], (0, "x".to_string()));
}

#[test]
fn y_only_position_pins_shapes() {
    let tall = || {
        RecordingCanvas::new(
            FontMetrics {
                ascent: 8,
                descent: 2,
                line_height: 12,
            },
            1,
        )
    };
    let shape = |canvas: &RecordingCanvas| {
        ops(canvas)
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { h: 2, .. }))
            .cloned()
            .collect::<Vec<_>>()
    };
    let target = LineTarget::new(Slot::Title, 40, Align::Left);

    // y alone: the rect follows the cursor row (default text y -1, moved down 3).
    let mut canvas = tall();
    LineRenderer::default().render(&mut canvas, "^p(;3)^r(4x2)", target);
    assert_eq!(shape(&canvas), vec![DrawOp::FillRect { x: 0, y: 2, w: 4, h: 2 }]);

    // x and y together move the cursor but shapes stay centered.
    let mut canvas = tall();
    LineRenderer::default().render(&mut canvas, "^p(1;3)^r(4x2)", target);
    assert_eq!(shape(&canvas), vec![DrawOp::FillRect { x: 1, y: 5, w: 4, h: 2 }]);

    let mut canvas = tall();
    LineRenderer::default().render(&mut canvas, "^pa(1;3)^r(4x2)", target);
    assert_eq!(shape(&canvas), vec![DrawOp::FillRect { x: 1, y: 5, w: 4, h: 2 }]);
}

#[test]
fn circles_full_and_partial() {
    let (canvas, content) = render("^c(4)", 20, Align::Left);
    assert!(ops(&canvas).contains(&DrawOp::FillArc {
        x: 0,
        y: -1,
        d: 4,
        sweep: 360
    }));
    assert_eq!(content, 4);
    let (canvas, _) = render("^co(4-90)", 20, Align::Left);
    assert!(ops(&canvas).contains(&DrawOp::DrawArc {
        x: 0,
        y: -1,
        d: 4,
        sweep: -90
    }));
}

#[test]
fn ignore_background_skips_run_fill() {
    let (canvas, _) = render("^ib(1)x", 20, Align::Left);
    let fills = ops(&canvas)
        .iter()
        .filter(|op| matches!(op, DrawOp::FillRect { .. }))
        .count();
    assert_eq!(fills, 1);
}

#[test]
fn icons_draw_when_they_fit() {
    let icon = Icon::bitmap(2, 1, vec![true, false]);
    let mut canvas = RecordingCanvas::cells().with_icon("a.xbm", icon.clone());
    let content = LineRenderer::default().render(
        &mut canvas,
        "^i(a.xbm)z",
        LineTarget::new(Slot::Title, 20, Align::Left),
    );
    assert!(ops(&canvas).contains(&DrawOp::Icon {
        x: 0,
        y: 0,
        width: 2,
        height: 1
    }));
    assert_eq!(content, 3);

    let mut narrow = RecordingCanvas::cells().with_icon("a.xbm", icon);
    let content = LineRenderer::default().render(
        &mut narrow,
        "^i(a.xbm)",
        LineTarget::new(Slot::Title, 2, Align::Left),
    );
    assert_eq!(content, 0);
    assert!(!ops(&narrow).iter().any(|op| matches!(op, DrawOp::Icon { .. })));
}

#[test]
fn missing_icon_is_skipped() {
    let (canvas, content) = render("^i(/nonexistent/icon.xbm)ok", 20, Align::Left);
    assert_eq!(text_x(&canvas), vec![(0, "ok".to_string())]);
    assert_eq!(content, 2);
}

#[test]
fn title_expands_left_from_right_corner() {
    let mut canvas = RecordingCanvas::cells();
    let expand = TitleExpand {
        mode: ExpandMode::Left,
        x: 10,
        right_corner: 30,
    };
    LineRenderer::default().render(
        &mut canvas,
        "abcd",
        LineTarget::new(Slot::Title, 20, Align::Center).expanding(Some(expand)),
    );
    assert_eq!(canvas.title_resizes, vec![(26, 4)]);
    assert_eq!(canvas.last().unwrap().dest_x, 0);

    let mut canvas = RecordingCanvas::cells();
    LineRenderer::default().render(
        &mut canvas,
        "abcd",
        LineTarget::new(Slot::Title, 20, Align::Center).expanding(Some(TitleExpand {
            mode: ExpandMode::Right,
            ..expand
        })),
    );
    assert_eq!(canvas.title_resizes, vec![(10, 4)]);
}

#[test]
fn sensitive_area_and_title_marker_draw_nothing() {
    let (canvas, content) = render("^sa(1)a^tw()b", 20, Align::Left);
    assert_eq!(
        text_x(&canvas),
        vec![(0, "a".to_string()), (1, "b".to_string())]
    );
    assert_eq!(content, 2);
    assert!(canvas.metrics().line_height > 0);
}

use core_render::{LineRenderer, LineTarget, Slot, Theme, TitleExpand};
use core_state::{Align, ExpandMode};
use core_terminal::{SlotLayout, TerminalCanvas, TerminalCapabilities};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::io::Write;

// Markup with numbers anywhere in the i32 range must render and flush without panicking,
// however far off the grid the cursor or the shapes end up.

fn screen() -> TerminalCanvas<Vec<u8>> {
    let layout = SlotLayout {
        title_width: 40,
        slave_width: 40,
        line_height: 1,
        lines: 2,
        ..SlotLayout::default()
    };
    TerminalCanvas::new(
        Vec::new(),
        40,
        3,
        layout,
        Theme::default(),
        TerminalCapabilities::from_colorterm("truecolor"),
    )
}

fn piece() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|x| format!("^p({x})")),
        any::<i32>().prop_map(|y| format!("^p(;{y})")),
        (any::<i32>(), any::<i32>()).prop_map(|(x, y)| format!("^p({x};{y})")),
        (any::<i32>(), any::<i32>()).prop_map(|(x, y)| format!("^pa({x};{y})")),
        (any::<i32>(), any::<i32>(), any::<i32>(), any::<i32>())
            .prop_map(|(w, h, x, y)| format!("^r({w}x{h}{x:+}{y:+})")),
        (any::<i32>(), any::<i32>(), any::<i32>(), any::<i32>())
            .prop_map(|(w, h, x, y)| format!("^ro({w}x{h}{x:+}{y:+})")),
        (any::<i32>(), any::<i32>()).prop_map(|(d, a)| format!("^c({d}{a:+})")),
        (any::<i32>(), any::<i32>()).prop_map(|(d, a)| format!("^co({d}{a:+})")),
        any::<i32>().prop_map(|d| format!("^c({d})")),
        "[a-z ]{0,6}".prop_map(String::from),
    ]
}

fn markup() -> impl Strategy<Value = String> {
    prop::collection::vec(piece(), 0..8).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn extreme_payloads_render_and_flush(
        line in markup(),
        width in 0i32..60,
        expand in prop::option::of(prop_oneof![Just(ExpandMode::Left), Just(ExpandMode::Right)]),
    ) {
        let mut canvas = screen();
        let renderer = LineRenderer::default();
        let expand = expand.map(|mode| TitleExpand { mode, x: 0, right_corner: 40 });
        renderer.render(
            &mut canvas,
            &line,
            LineTarget::new(Slot::Title, width, Align::Left).expanding(expand),
        );
        renderer.render(&mut canvas, &line, LineTarget::new(Slot::Line(0), width, Align::Right));
        renderer.render(
            &mut canvas,
            &line,
            LineTarget::new(Slot::Line(1), width, Align::Center).reversed(true),
        );
        prop_assert!(canvas.flush().is_ok());
        for row in 0..3 {
            prop_assert!(canvas.screen().row_text(row).chars().count() <= 40);
        }
    }
}

#[test]
fn far_right_cursor_outline_is_dropped() {
    let mut canvas = screen();
    let content = LineRenderer::default().render(
        &mut canvas,
        "^p(2147483647)^ro(4x2)",
        LineTarget::new(Slot::Title, 12, Align::Left),
    );
    assert_eq!(content, i32::MAX);
    assert_eq!(canvas.screen().row_text(0).trim(), "");
}

#[test]
fn corrupt_icon_headers_are_skipped() {
    let headers = [
        "\"1 18446744073709551615 1 1\", \"a c #ff0000\", \"a\"",
        "\"2305843009213693952 1 1 1\", \"a c #ff0000\", \"a\"",
        "\"4000000000 1 1 1\", \"a c #ff0000\", \"a\"",
    ];
    for header in headers {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "/* XPM */\nstatic char *x[] = {{ {header} }};\n").unwrap();
        let line = format!("^i({})ok", file.path().display());
        let mut canvas = screen();
        let content = LineRenderer::default().render(
            &mut canvas,
            &line,
            LineTarget::new(Slot::Title, 12, Align::Left),
        );
        assert_eq!(content, 2);
        assert_eq!(canvas.screen().row_text(0), format!("ok{}", " ".repeat(38)));
    }
}

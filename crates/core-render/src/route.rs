//! Line routing between the title and the slave buffer.

use core_markup::ESC_CHAR;

const TITLE_MARKER: &str = "^tw()";
const CLEAR_MARKER: &str = "^cs";

/// Where an incoming line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Replace the title with this markup.
    Title(&'a str),
    /// Empty the slave buffer.
    Clear,
    /// Append to the slave buffer.
    Body(&'a str),
}

/// Decide where `line` goes. The first line and every line of a bar without slave lines
/// are titles; later lines are titles only when they carry an unescaped `^tw()`.
pub fn route_line(line: &str, first_line: bool, has_slave_lines: bool) -> Route<'_> {
    if first_line || !has_slave_lines {
        return Route::Title(line);
    }
    if let Some(rest) = title_payload(line) {
        return Route::Title(rest);
    }
    if line.starts_with(CLEAR_MARKER) {
        return Route::Clear;
    }
    Route::Body(line)
}

// Text after the first `^tw()`. An escaped first occurrence makes the whole line a body
// line; later occurrences are not considered.
fn title_payload(line: &str) -> Option<&str> {
    let at = line.find(TITLE_MARKER)?;
    if line[..at].ends_with(ESC_CHAR) {
        return None;
    }
    Some(&line[at + TITLE_MARKER.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_line_is_title() {
        assert_eq!(route_line("^cs", true, true), Route::Title("^cs"));
    }

    #[test]
    fn titles_only_without_slave() {
        assert_eq!(route_line("hello", false, false), Route::Title("hello"));
        assert_eq!(route_line("^tw()x", false, false), Route::Title("^tw()x"));
    }

    #[test]
    fn title_marker_routes_rest() {
        assert_eq!(route_line("^tw()new title", false, true), Route::Title("new title"));
        assert_eq!(route_line("pre ^tw()t", false, true), Route::Title("t"));
    }

    #[test]
    fn escaped_marker_is_body() {
        assert_eq!(route_line("^^tw()x", false, true), Route::Body("^^tw()x"));
        // Only the first occurrence counts.
        assert_eq!(
            route_line("^^tw()x ^tw()y", false, true),
            Route::Body("^^tw()x ^tw()y")
        );
        assert_eq!(route_line("a^tw()b^tw()c", false, true), Route::Title("b^tw()c"));
    }

    #[test]
    fn clear_and_body() {
        assert_eq!(route_line("^cs()", false, true), Route::Clear);
        assert_eq!(route_line("x^cs()", false, true), Route::Body("x^cs()"));
        assert_eq!(route_line("plain", false, true), Route::Body("plain"));
    }
}

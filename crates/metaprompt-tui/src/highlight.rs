//! Prompt highlighting for the editor panes.
//!
//! Whole-line rules win over inline ones: a markdown header or a `- ` bullet
//! is styled as a unit, otherwise `<…>` and `[…]` spans are marked inside the
//! line. Where the two inline rules overlap, square brackets win.

use std::ops::Range;
use std::sync::LazyLock;

use ratatui::prelude::*;
use regex::Regex;

static ANGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("angle pattern is valid"));
static SQUARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("square pattern is valid"));
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+ ").expect("header pattern is valid"));

pub const ANGLE_COLOR: Color = Color::Rgb(0x00, 0x77, 0xFF);
pub const SQUARE_COLOR: Color = Color::Rgb(0xFF, 0x95, 0x00);
pub const HEADER_COLOR: Color = Color::Rgb(0xE0, 0x20, 0x20);
pub const BULLET_COLOR: Color = Color::Rgb(0x00, 0xB0, 0x50);

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Highlight a whole prompt, one [`Line`] per source line.
pub fn highlight_prompt(text: &str) -> Vec<Line<'static>> {
    text.split('\n').map(highlight_line).collect()
}

/// Highlight a single line (no newline).
pub fn highlight_line(line: &str) -> Line<'static> {
    if HEADER.is_match(line) {
        return Line::from(Span::styled(line.to_string(), bold(HEADER_COLOR)));
    }
    if line.starts_with("- ") {
        return Line::from(Span::styled(line.to_string(), bold(BULLET_COLOR)));
    }

    let mut marks: Vec<(Range<usize>, Style)> = ANGLE
        .find_iter(line)
        .map(|m| (m.range(), bold(ANGLE_COLOR)))
        .collect();
    marks.extend(SQUARE.find_iter(line).map(|m| (m.range(), bold(SQUARE_COLOR))));
    if marks.is_empty() {
        return Line::from(line.to_string());
    }

    // Paint styles per byte, later rules over earlier ones, then group runs.
    let mut styles = vec![Style::default(); line.len()];
    for (range, style) in marks {
        for slot in &mut styles[range] {
            *slot = style;
        }
    }

    let mut spans = Vec::new();
    let mut start = 0;
    for end in 1..=line.len() {
        if end == line.len() || (styles[end] != styles[start] && line.is_char_boundary(end)) {
            if let Some(piece) = line.get(start..end) {
                spans.push(Span::styled(piece.to_string(), styles[start]));
            }
            start = end;
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(line: &Line<'_>) -> Vec<(String, Option<Color>)> {
        line.spans
            .iter()
            .map(|s| (s.content.to_string(), s.style.fg))
            .collect()
    }

    #[test]
    fn plain_line_is_one_unstyled_span() {
        let line = highlight_line("just text");
        assert_eq!(pieces(&line), vec![("just text".to_string(), None)]);
    }

    #[test]
    fn header_and_bullet_style_the_whole_line() {
        let header = highlight_line("## Output <format>");
        assert_eq!(
            pieces(&header),
            vec![("## Output <format>".to_string(), Some(HEADER_COLOR))]
        );
        assert!(header.spans[0].style.add_modifier.contains(Modifier::BOLD));

        let bullet = highlight_line("- keep it short");
        assert_eq!(
            pieces(&bullet),
            vec![("- keep it short".to_string(), Some(BULLET_COLOR))]
        );
    }

    #[test]
    fn header_needs_a_space() {
        let line = highlight_line("#hashtag");
        assert_eq!(pieces(&line), vec![("#hashtag".to_string(), None)]);
        let indented = highlight_line("  - nested");
        assert_eq!(indented.spans[0].style.fg, None);
    }

    #[test]
    fn inline_brackets() {
        let line = highlight_line("Use <tag> and [slot] here");
        assert_eq!(
            pieces(&line),
            vec![
                ("Use ".to_string(), None),
                ("<tag>".to_string(), Some(ANGLE_COLOR)),
                (" and ".to_string(), None),
                ("[slot]".to_string(), Some(SQUARE_COLOR)),
                (" here".to_string(), None),
            ]
        );
    }

    #[test]
    fn square_wins_overlap() {
        let line = highlight_line("<a [b> c]");
        assert_eq!(
            pieces(&line),
            vec![
                ("<a ".to_string(), Some(ANGLE_COLOR)),
                ("[b> c]".to_string(), Some(SQUARE_COLOR)),
            ]
        );
    }

    #[test]
    fn multibyte_text_is_kept_whole() {
        let line = highlight_line("héllo <wörld> ✓");
        let joined: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(joined, "héllo <wörld> ✓");
        assert_eq!(line.spans[1].content, "<wörld>");
    }

    #[test]
    fn prompt_keeps_empty_lines() {
        let lines = highlight_prompt("# Title\n\n- item");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].spans.iter().all(|s| s.content.is_empty()));
    }
}

use std::path::Path;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Default character budget for previewed text.
pub const DEFAULT_MAX_PREVIEW_CHARS: usize = 200_000;
/// Appended to previews cut at the character budget.
pub const TRUNCATION_MARKER: &str = "\n\n… [truncated]";
/// Default syntect theme.
pub const DEFAULT_SYNTAX_THEME: &str = "base16-ocean.dark";

/// Cut `text` to at most `limit` characters, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
pub fn truncate_preview(mut text: String, limit: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(limit) {
        text.truncate(byte_idx);
        text.push_str(TRUNCATION_MARKER);
    }
    text
}

/// Load a theme from the built-in theme set by name, with fallback.
pub fn load_theme(theme_name: &str) -> Theme {
    let mut ts = ThemeSet::load_defaults();
    match ts.themes.remove(theme_name) {
        Some(theme) => theme,
        None => {
            tracing::warn!(theme = theme_name, "unknown syntax theme, using default");
            ts.themes
                .remove(DEFAULT_SYNTAX_THEME)
                .unwrap_or_default()
        }
    }
}

/// Convert syntect color to ratatui Color.
fn syntect_color_to_ratatui(c: syntect::highlighting::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Syntax highlighter for preview text, shared across preview tasks.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_nonewlines(),
            theme: load_theme(theme_name),
        }
    }

    /// Pick a syntax from the file extension, then the first line
    /// (shebangs, modelines), then plain text.
    fn syntax_for(&self, path: &str, text: &str) -> &SyntaxReference {
        let ss = &self.syntax_set;
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| ss.find_syntax_by_extension(ext))
            .or_else(|| ss.find_syntax_by_first_line(text))
            .unwrap_or_else(|| ss.find_syntax_plain_text())
    }

    /// Highlight `text` into line-numbered styled lines.
    pub fn highlight(&self, path: &str, text: &str, line_nr_fg: Color) -> Vec<Line<'static>> {
        let syntax = self.syntax_for(path, text);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let width = line_number_width(text);

        text.lines()
            .enumerate()
            .map(|(i, line_str)| {
                let mut spans = vec![line_number(i + 1, width, line_nr_fg)];
                match highlighter.highlight_line(line_str, &self.syntax_set) {
                    Ok(ranges) => {
                        for (style, piece) in ranges {
                            let fg = syntect_color_to_ratatui(style.foreground);
                            spans.push(Span::styled(piece.to_string(), Style::default().fg(fg)));
                        }
                    }
                    Err(_) => spans.push(Span::raw(line_str.to_string())),
                }
                Line::from(spans)
            })
            .collect()
    }
}

/// Line-numbered lines without highlighting.
pub fn plain_lines(text: &str, line_nr_fg: Color) -> Vec<Line<'static>> {
    let width = line_number_width(text);
    text.lines()
        .enumerate()
        .map(|(i, line_str)| {
            Line::from(vec![
                line_number(i + 1, width, line_nr_fg),
                Span::raw(line_str.to_string()),
            ])
        })
        .collect()
}

fn line_number_width(text: &str) -> usize {
    text.lines().count().max(1).to_string().len()
}

fn line_number(n: usize, width: usize, fg: Color) -> Span<'static> {
    Span::styled(format!("{:>width$} │ ", n), Style::default().fg(fg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn long_text_is_cut_at_budget_with_marker() {
        let text = "a".repeat(250_000);
        let out = truncate_preview(text, DEFAULT_MAX_PREVIEW_CHARS);
        assert_eq!(out.len(), 200_000 + TRUNCATION_MARKER.len());
        let (kept, marker) = out.split_at(200_000);
        assert_eq!(kept, "a".repeat(200_000));
        assert_eq!(marker, TRUNCATION_MARKER);
    }

    #[test]
    fn short_text_is_unchanged() {
        let text = "b".repeat(150_000);
        assert_eq!(truncate_preview(text.clone(), DEFAULT_MAX_PREVIEW_CHARS), text);
    }

    #[test]
    fn text_exactly_at_budget_is_unchanged() {
        let text = "c".repeat(10);
        assert_eq!(truncate_preview(text.clone(), 10), text);
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        let text = "é".repeat(12);
        let out = truncate_preview(text, 10);
        assert_eq!(out, format!("{}{}", "é".repeat(10), TRUNCATION_MARKER));
    }

    #[test]
    fn plain_lines_are_numbered() {
        let lines = plain_lines("one\ntwo\nthree", Color::DarkGray);
        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[0]), "1 │ one");
        assert_eq!(line_text(&lines[2]), "3 │ three");
    }

    #[test]
    fn line_numbers_are_right_aligned() {
        let text = (1..=12).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let lines = plain_lines(&text, Color::DarkGray);
        assert_eq!(line_text(&lines[0]), " 1 │ 1");
        assert_eq!(line_text(&lines[11]), "12 │ 12");
    }

    #[test]
    fn highlight_keeps_text_content() {
        let hl = Highlighter::new(DEFAULT_SYNTAX_THEME);
        let lines = hl.highlight("/src/main.rs", "fn main() {}\n// done", Color::DarkGray);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "1 │ fn main() {}");
        assert!(lines[0].spans.len() > 2, "expected highlighted spans");
    }

    #[test]
    fn highlight_detects_shebang_without_extension() {
        let hl = Highlighter::new(DEFAULT_SYNTAX_THEME);
        let text = "#!/usr/bin/env python3\nprint('x')";
        assert_eq!(hl.syntax_for("/bin/tool", text).name, "Python");
        assert_eq!(hl.syntax_for("/notes/readme", "hello").name, "Plain Text");
    }

    #[test]
    fn unknown_theme_falls_back() {
        let hl = Highlighter::new("no-such-theme");
        let lines = hl.highlight("/a.txt", "x", Color::DarkGray);
        assert_eq!(line_text(&lines[0]), "1 │ x");
    }
}

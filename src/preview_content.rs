use std::path::Path;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::config::DEFAULT_SYNTAX_THEME;
use crate::fs::operations::{read_note, NoteContent};
use crate::theme::ThemeColors;

/// Load a theme from the built-in theme set by name, with fallback.
pub fn load_theme(theme_name: &str) -> Theme {
    let mut ts = ThemeSet::load_defaults();
    match ts.themes.remove(theme_name) {
        Some(theme) => theme,
        None => {
            tracing::warn!(theme = theme_name, "unknown syntax theme, using default");
            ts.themes.remove(DEFAULT_SYNTAX_THEME).unwrap_or_default()
        }
    }
}

/// Markdown for `.md`/`.markdown`, plain text for everything else.
fn syntax_for<'a>(path: &Path, ss: &'a SyntaxSet) -> &'a SyntaxReference {
    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false);
    if is_markdown {
        ss.find_syntax_by_name("Markdown")
            .unwrap_or_else(|| ss.find_syntax_plain_text())
    } else {
        ss.find_syntax_plain_text()
    }
}

fn syntect_color_to_ratatui(c: syntect::highlighting::Color) -> ratatui::style::Color {
    ratatui::style::Color::Rgb(c.r, c.g, c.b)
}

/// Highlight `text` as the note at `path`, with a line-number gutter.
pub fn highlight_note(
    text: &str,
    path: &Path,
    ss: &SyntaxSet,
    theme: &Theme,
    colors: &ThemeColors,
) -> Vec<Line<'static>> {
    let syntax = syntax_for(path, ss);
    let mut highlighter = HighlightLines::new(syntax, theme);
    let lines_text: Vec<&str> = text.lines().collect();
    let gutter_width = lines_text.len().max(1).to_string().len();
    let gutter_style = Style::default().fg(colors.preview_gutter_fg);

    let mut result = Vec::with_capacity(lines_text.len());
    for (i, line_str) in lines_text.iter().enumerate() {
        let mut spans: Vec<Span<'static>> = Vec::new();
        spans.push(Span::styled(
            format!("{:>width$} │ ", i + 1, width = gutter_width),
            gutter_style,
        ));

        match highlighter.highlight_line(line_str, ss) {
            Ok(ranges) => {
                for (style, piece) in ranges {
                    let fg = syntect_color_to_ratatui(style.foreground);
                    spans.push(Span::styled(piece.to_string(), Style::default().fg(fg)));
                }
            }
            Err(_) => spans.push(Span::styled(
                line_str.to_string(),
                Style::default().fg(colors.preview_fg),
            )),
        }
        result.push(Line::from(spans));
    }
    result
}

/// Read and render the note at `path` for the preview panel.
///
/// Missing or unreadable files produce a one-line message instead of content.
pub fn load_note_preview(
    path: &Path,
    ss: &SyntaxSet,
    theme: &Theme,
    colors: &ThemeColors,
) -> Vec<Line<'static>> {
    match read_note(path) {
        NoteContent::Text(text) => {
            let lines = highlight_note(&text, path, ss, theme, colors);
            if lines.is_empty() {
                vec![message_line("(empty note)", Style::default().fg(colors.dim_fg))]
            } else {
                lines
            }
        }
        NoteContent::Missing => {
            tracing::debug!(path = %path.display(), "selected note is gone");
            vec![message_line(
                "This note no longer exists",
                Style::default().fg(colors.error_fg),
            )]
        }
        NoteContent::Unreadable(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read note");
            vec![message_line(
                format!("Cannot read note: {}", e),
                Style::default().fg(colors.error_fg),
            )]
        }
    }
}

fn message_line(msg: impl Into<String>, style: Style) -> Line<'static> {
    Line::from(Span::styled(msg.into(), style.add_modifier(Modifier::ITALIC)))
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }
}

/// Calculate a centered rectangle within the given area.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let AppMode::Dialog(kind) = self.mode else {
            return;
        };
        match kind {
            DialogKind::NewNote => {
                render_input_dialog("New Note", "Title:", self.dialog_state, self.theme, area, buf)
            }
        }
    }
}

fn render_input_dialog(
    title: &str,
    prompt: &str,
    state: &DialogState,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let rect = centered_rect(50.min(area.width.saturating_sub(4)), 6, area);
    Clear.render(rect, buf);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border_fg))
        .padding(Padding::horizontal(1));
    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let prompt_line = Line::from(Span::styled(prompt, Style::default().fg(theme.info_fg)));
    buf.set_line(inner.x, inner.y, &prompt_line, inner.width);

    // Input with a block cursor; the char under it is highlighted.
    let input = &state.input;
    let (before, rest) = input.split_at(state.cursor_position.min(input.len()));
    let mut rest_chars = rest.chars();
    let cursor_char = rest_chars
        .next()
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after = rest_chars.as_str();

    // Keep the cursor visible by dropping chars from the left.
    let max_before = (inner.width as usize).saturating_sub(2);
    let before_len = before.chars().count();
    let before_display: String = before
        .chars()
        .skip(before_len.saturating_sub(max_before))
        .collect();

    let input_style = Style::default().fg(theme.preview_fg);
    let cursor_style = Style::default()
        .bg(theme.preview_fg)
        .fg(theme.status_bg)
        .add_modifier(Modifier::BOLD);
    let input_line = Line::from(vec![
        Span::styled(before_display, input_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after.to_string(), input_style),
    ]);
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + 1, &input_line, inner.width);
    }

    let hint = "[Enter] Confirm  [Esc] Cancel";
    let hint_style = Style::default().fg(theme.dim_fg).add_modifier(Modifier::DIM);
    if inner.height > 2 {
        buf.set_line(
            inner.x,
            inner.y + inner.height - 1,
            &Line::from(Span::styled(hint, hint_style)),
            inner.width,
        );
    }
}

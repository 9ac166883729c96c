use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " n:new  e:edit  o:open  r:refresh  q:quit ";

/// Status bar widget: cursor path and tree info, or a transient message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

/// Keep the last `max` chars of `s`, marking the cut with "...".
fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().skip(len - max).collect();
    }
    let tail: String = s.chars().skip(len - (max - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let bar_style = Style::default().bg(self.theme.status_bg);
        buf.set_style(area, bar_style);

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                bar_style.fg(self.theme.success_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);
            buf.set_line(area.x, area.y, &Line::from(Span::styled(display, style)), area.width);
            return;
        }

        // [path] ... [info] [hints]
        let hints_len = KEY_HINTS.chars().count();
        let info_len = self.info.chars().count();
        let path_budget = width.saturating_sub(hints_len + info_len + 1);
        let path_display = truncate_left(self.path_str, path_budget);
        let gap = width
            .saturating_sub(path_display.chars().count() + info_len + hints_len)
            .max(1);

        let spans = vec![
            Span::styled(path_display, bar_style.fg(self.theme.status_fg)),
            Span::styled(" ".repeat(gap), bar_style),
            Span::styled(self.info, bar_style.fg(self.theme.info_fg)),
            Span::styled(
                KEY_HINTS,
                bar_style.fg(self.theme.dim_fg).add_modifier(Modifier::DIM),
            ),
        ];
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

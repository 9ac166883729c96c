use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::PreviewState;
use crate::theme::ThemeColors;

/// Shown when no note is opened.
pub const PLACEHOLDER: &str = "Select a note to preview";

/// Preview widget that renders the opened note.
pub struct PreviewWidget<'a> {
    preview_state: &'a PreviewState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(preview_state: &'a PreviewState, theme: &'a ThemeColors) -> Self {
        Self {
            preview_state,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }
}

impl<'a> Widget for PreviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = &self.preview_state.content_lines;
        if lines.is_empty() {
            let style = Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::ITALIC);
            let line = Line::from(Span::styled(PLACEHOLDER, style));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let start = self.preview_state.scroll_offset.min(lines.len());
        let end = (start + inner.height as usize).min(lines.len());
        for (i, line) in lines[start..end].iter().enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}

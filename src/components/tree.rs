use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::node::NodeKind;
use crate::fs::tree::{FlatItem, TreeState};
use crate::theme::ThemeColors;

/// Tree widget that renders the notes tree with box-drawing characters.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeState,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_state: &'a TreeState, theme: &'a ThemeColors, use_icons: bool) -> Self {
        Self {
            tree_state,
            theme,
            use_icons,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Connector prefix: one column per ancestor below the root, then the
    /// branch for the item itself. Empty for the root.
    fn build_prefix(item: &FlatItem) -> String {
        if item.depth == 0 {
            return String::new();
        }
        let mut prefix = String::with_capacity(item.depth * 3);
        for &continues in &item.continuations {
            prefix.push_str(if continues { "│  " } else { "   " });
        }
        prefix.push_str(if item.has_next_sibling { "├──" } else { "└──" });
        prefix
    }

    fn item_indicator(&self, item: &FlatItem) -> &'static str {
        match (item.kind, self.use_icons) {
            (NodeKind::Folder, true) if item.is_expanded => " \u{f07c} ",
            (NodeKind::Folder, true) => " \u{f07b} ",
            (NodeKind::Document, true) => " \u{f48a} ",
            (NodeKind::Folder, false) if item.is_expanded => " [-] ",
            (NodeKind::Folder, false) => " [+] ",
            (NodeKind::Document, false) => " ",
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let items = &self.tree_state.flat_items;
        let visible_height = inner_area.height as usize;
        if items.is_empty() || visible_height == 0 {
            return;
        }

        let connector_style = Style::default().fg(self.theme.tree_connector_fg);
        let visible = items
            .iter()
            .enumerate()
            .skip(self.tree_state.scroll_offset)
            .take(visible_height);

        for (row, (idx, item)) in visible.enumerate() {
            let y = inner_area.y + row as u16;

            let is_cursor = idx == self.tree_state.cursor;
            let is_opened = self.tree_state.is_selected(&item.path);

            let name_style = if is_cursor {
                Style::default()
                    .bg(self.theme.tree_cursor_bg)
                    .fg(self.theme.tree_cursor_fg)
                    .add_modifier(Modifier::BOLD)
            } else if is_opened {
                Style::default()
                    .fg(self.theme.tree_opened_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                match item.kind {
                    NodeKind::Folder => Style::default()
                        .fg(self.theme.tree_folder_fg)
                        .add_modifier(Modifier::BOLD),
                    NodeKind::Document => Style::default().fg(self.theme.tree_note_fg),
                }
            };

            let marker = if is_opened { " ●" } else { "" };
            let line = Line::from(vec![
                Span::styled(Self::build_prefix(item), connector_style),
                Span::styled(
                    format!("{}{}{}", self.item_indicator(item), item.name, marker),
                    name_style,
                ),
            ]);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}

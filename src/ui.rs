use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::dialog::DialogWidget;
use crate::components::preview::PreviewWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let (tree_area, preview_area) = if app.config.preview_enabled() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(rows[0]);
        (cols[0], Some(cols[1]))
    } else {
        (rows[0], None)
    };

    render_tree(app, frame, tree_area);
    if let Some(preview_area) = preview_area {
        render_preview(app, frame, preview_area);
    }
    render_status(app, frame, rows[1]);

    if matches!(app.mode, AppMode::Dialog(_)) {
        frame.render_widget(
            DialogWidget::new(&app.mode, &app.dialog_state, &app.theme),
            area,
        );
    }
}

fn render_tree(app: &mut App, frame: &mut Frame, area: Rect) {
    let title = app
        .base_dir()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| app.base_dir().display().to_string());
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focused_fg));

    if app.tree_state.tree.is_none() {
        let message = if app.tree_state.loading {
            vec![Line::from(Span::styled(
                "Loading…",
                Style::default().fg(app.theme.dim_fg),
            ))]
        } else {
            empty_state_lines(app)
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    }

    // Keep the cursor visible
    let visible_height = area.height.saturating_sub(2) as usize;
    app.tree_state.update_scroll(visible_height);

    let widget = TreeWidget::new(&app.tree_state, &app.theme, app.config.use_icons()).block(block);
    frame.render_widget(widget, area);
}

fn empty_state_lines(app: &App) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "No notes folder",
            Style::default()
                .fg(app.theme.error_fg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.base_dir().display().to_string(),
            Style::default().fg(app.theme.tree_fg),
        )),
        Line::default(),
        Line::from(Span::styled(
            "n: create a note there   r: retry",
            Style::default().fg(app.theme.dim_fg),
        )),
    ]
}

fn render_preview(app: &mut App, frame: &mut Frame, area: Rect) {
    app.preview_height = area.height.saturating_sub(2) as usize;
    let title = app
        .preview
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| format!(" {} ", n.to_string_lossy()))
        .unwrap_or_else(|| " Preview ".to_string());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    frame.render_widget(PreviewWidget::new(&app.preview, &app.theme).block(block), area);
}

fn render_status(app: &mut App, frame: &mut Frame, area: Rect) {
    app.clear_expired_status();

    let path_str = app
        .tree_state
        .cursor_item()
        .map(|item| {
            item.path
                .strip_prefix(&app.tree_state.root_path)
                .unwrap_or(&item.path)
                .display()
                .to_string()
        })
        .unwrap_or_default();
    let info = if app.tree_state.loading {
        "loading…".to_string()
    } else {
        match &app.tree_state.tree {
            Some(tree) => {
                let notes = tree.iter().filter(|(_, node)| !node.is_folder()).count();
                format!("{} notes", notes)
            }
            None => "no folder".to_string(),
        }
    };

    let mut widget = StatusBarWidget::new(&path_str, &info, &app.theme);
    if let Some(status) = &app.status_message {
        widget = widget.status_message(&status.text, status.is_error);
    }
    frame.render_widget(widget, area);
}

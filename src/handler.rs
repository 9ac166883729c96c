use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, AppMode, DialogKind};
use crate::event::Event;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent, tx: &UnboundedSender<Event>) {
    // Windows reports releases too.
    if key.kind == KeyEventKind::Release {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode.clone() {
        AppMode::Normal => handle_normal_key(app, key, tx),
        AppMode::Dialog(kind) => handle_dialog_key(app, key, kind, tx),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<Event>) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_cursor(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_cursor(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_cursor(),
        KeyCode::Char('r') => {
            app.request_rebuild(tx);
            app.set_status_message("Refreshing…".to_string());
        }
        KeyCode::Char('n') => app.open_dialog(DialogKind::NewNote),
        KeyCode::Char('e') => app.edit_note(),
        KeyCode::Char('o') => app.open_base_folder(),
        KeyCode::Char('J') => app.preview.scroll_down(1),
        KeyCode::Char('K') => app.preview.scroll_up(1),
        KeyCode::PageDown => app.preview_page_down(),
        KeyCode::PageUp => app.preview_page_up(),
        _ => {}
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent, kind: DialogKind, tx: &UnboundedSender<Event>) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => match kind {
            DialogKind::NewNote => app.confirm_new_note(tx),
        },
        KeyCode::Backspace => app.dialog_delete_char(),
        KeyCode::Left => app.dialog_move_cursor_left(),
        KeyCode::Right => app.dialog_move_cursor_right(),
        KeyCode::Home => app.dialog_cursor_home(),
        KeyCode::End => app.dialog_cursor_end(),
        KeyCode::Char(c) => app.dialog_input_char(c),
        _ => {}
    }
}

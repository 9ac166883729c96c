use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Instant;

use chrono::NaiveDateTime;
use ratatui::text::Line;
use syntect::highlighting::Theme;
use syntect::parsing::SyntaxSet;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::event::Event;
use crate::fs::builder::build_in_background;
use crate::fs::node::{NodeKind, NoteTree};
use crate::fs::operations::create_note;
use crate::fs::tree::TreeState;
use crate::launcher::{self, EditorLaunch, LaunchCommand};
use crate::preview_content::{load_note_preview, load_theme};
use crate::theme::{resolve_theme, ThemeColors};

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// Ask for the title of a new note.
    NewNote,
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
}

/// State for a dialog's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    /// Byte offset into `input`, always on a char boundary.
    pub cursor_position: usize,
}

/// A transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

/// Rendered content of the opened note.
#[derive(Debug, Default)]
pub struct PreviewState {
    pub path: Option<PathBuf>,
    pub content_lines: Vec<Line<'static>>,
    pub scroll_offset: usize,
}

impl PreviewState {
    /// Scroll down, keeping at least the last line on screen.
    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.content_lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max);
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn clear(&mut self) {
        *self = PreviewState::default();
    }
}

/// Work the main loop has to do because it owns the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Suspend the TUI, run the editor, then resume.
    EditInTerminal(LaunchCommand),
}

/// Main application state.
pub struct App {
    pub config: AppConfig,
    pub theme: ThemeColors,
    pub tree_state: TreeState,
    pub preview: PreviewState,
    pub mode: AppMode,
    pub dialog_state: DialogState,
    pub status_message: Option<StatusMessage>,
    pub pending: Option<PendingAction>,
    pub should_quit: bool,
    /// Rows available to the preview body, updated on every draw.
    pub preview_height: usize,
    syntax_set: SyntaxSet,
    syntax_theme: Theme,
}

impl App {
    /// Create an App for the notes folder named by `config`.
    ///
    /// The tree starts out loading; call [`App::request_rebuild`] to fill it.
    pub fn new(config: AppConfig) -> Self {
        let root = config.base_directory();
        let theme = resolve_theme(config.theme_scheme());
        let syntax_theme = load_theme(config.syntax_theme_name());
        Self {
            tree_state: TreeState::new(&root),
            theme,
            preview: PreviewState::default(),
            mode: AppMode::Normal,
            dialog_state: DialogState::default(),
            status_message: None,
            pending: None,
            should_quit: false,
            preview_height: 0,
            syntax_set: SyntaxSet::load_defaults_nonewlines(),
            syntax_theme,
            config,
        }
    }

    /// Root of the notes tree.
    pub fn base_dir(&self) -> &Path {
        &self.tree_state.root_path
    }

    // ── Tree building ───────────────────────────────────────────────────────

    /// Start a background build of the notes folder.
    ///
    /// The result arrives as [`Event::TreeBuilt`] on `tx`.
    pub fn request_rebuild(&mut self, tx: &UnboundedSender<Event>) {
        let generation = self.tree_state.begin_build();
        let root = self.tree_state.root_path.clone();
        let tx = tx.clone();
        tracing::debug!(root = %root.display(), generation, "requesting tree build");
        tokio::spawn(async move {
            let tree = build_in_background(root.clone()).await;
            let _ = tx.send(Event::TreeBuilt {
                root,
                generation,
                tree,
            });
        });
    }

    /// Install a finished build, unless it was for another root or a newer
    /// build has been requested since.
    pub fn handle_tree_built(&mut self, root: PathBuf, generation: u64, tree: Option<NoteTree>) {
        if root != self.tree_state.root_path || !self.tree_state.is_current_build(generation) {
            tracing::debug!(root = %root.display(), generation, "discarding stale tree build");
            return;
        }
        self.tree_state.replace_tree(tree);
        match self.tree_state.selected_path.clone() {
            Some(path) => self.load_preview(&path),
            None => self.preview.clear(),
        }
    }

    // ── Notes ───────────────────────────────────────────────────────────────

    /// Toggle the folder under the cursor or open the note under it.
    pub fn activate_cursor(&mut self) {
        if let Some(path) = self.tree_state.activate_cursor() {
            self.open_note(&path);
        }
    }

    /// Select `path` and show it in the preview.
    pub fn open_note(&mut self, path: &Path) {
        self.tree_state.selected_path = Some(path.to_path_buf());
        self.load_preview(path);
        tracing::debug!(path = %path.display(), "opened note");
    }

    fn load_preview(&mut self, path: &Path) {
        let keep_scroll = self.preview.path.as_deref() == Some(path);
        let offset = if keep_scroll { self.preview.scroll_offset } else { 0 };
        self.preview.content_lines =
            load_note_preview(path, &self.syntax_set, &self.syntax_theme, &self.theme);
        self.preview.path = Some(path.to_path_buf());
        self.preview.scroll_offset = 0;
        self.preview.scroll_down(offset);
    }

    /// Create a note from the dialog input and rebuild the tree around it.
    pub fn confirm_new_note(&mut self, tx: &UnboundedSender<Event>) {
        let title = self.dialog_state.input.trim().to_string();
        self.close_dialog();
        if title.is_empty() {
            return;
        }
        self.create_note_at(&title, chrono::Local::now().naive_local(), tx);
    }

    fn create_note_at(&mut self, title: &str, now: NaiveDateTime, tx: &UnboundedSender<Event>) {
        match create_note(&self.tree_state.root_path, title, now) {
            Ok(path) => {
                self.open_note(&path);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.set_status_message(format!("Created {}", name));
                self.request_rebuild(tx);
            }
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::warn!(title, "note file already exists");
                self.set_error_message("A note with that name already exists".to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not create note");
                self.set_error_message(format!("Could not create note: {}", e));
            }
        }
    }

    /// The note an edit applies to: the opened one, else the one under the cursor.
    pub fn edit_target(&self) -> Option<PathBuf> {
        if let Some(path) = &self.tree_state.selected_path {
            return Some(path.clone());
        }
        self.tree_state
            .cursor_item()
            .filter(|item| item.kind == NodeKind::Document)
            .map(|item| item.path.clone())
    }

    /// Edit the target note per the editor preferences.
    pub fn edit_note(&mut self) {
        let Some(path) = self.edit_target() else {
            self.set_error_message("No note selected".to_string());
            return;
        };
        match launcher::editor_command(&self.config, &launcher::terminal_editor(), &path) {
            Ok(EditorLaunch::InTerminal(cmd)) => {
                self.pending = Some(PendingAction::EditInTerminal(cmd));
            }
            Ok(EditorLaunch::Detached(cmd)) => match launcher::spawn_detached(&cmd) {
                Ok(()) => self.set_status_message(format!("Opened in {}", cmd.program)),
                Err(e) => self.set_error_message(e.to_string()),
            },
            Err(e) => self.set_error_message(e.to_string()),
        }
    }

    /// Report the outcome of a terminal edit and pick up changes on disk.
    pub fn finish_terminal_edit(&mut self, result: Result<ExitStatus>, tx: &UnboundedSender<Event>) {
        match result {
            Ok(status) if status.success() => {}
            Ok(status) => self.set_error_message(format!(
                "Editor exited with {}",
                status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "a signal".to_string())
            )),
            Err(e) => self.set_error_message(e.to_string()),
        }
        if let Some(path) = self.preview.path.clone() {
            self.load_preview(&path);
        }
        self.request_rebuild(tx);
    }

    /// Open the notes folder per the opener preferences.
    pub fn open_base_folder(&mut self) {
        let result = launcher::opener_command(&self.config, &self.tree_state.root_path)
            .and_then(|cmd| launcher::spawn_detached(&cmd));
        match result {
            Ok(()) => self.set_status_message("Opened notes folder".to_string()),
            Err(e) => self.set_error_message(e.to_string()),
        }
    }

    // ── Dialog ──────────────────────────────────────────────────────────────

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    /// Insert a character at the current cursor position.
    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn dialog_delete_char(&mut self) {
        let state = &mut self.dialog_state;
        if let Some(prev) = state.input[..state.cursor_position].chars().next_back() {
            state.cursor_position -= prev.len_utf8();
            state.input.remove(state.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn dialog_move_cursor_left(&mut self) {
        let state = &mut self.dialog_state;
        if let Some(prev) = state.input[..state.cursor_position].chars().next_back() {
            state.cursor_position -= prev.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn dialog_move_cursor_right(&mut self) {
        let state = &mut self.dialog_state;
        if let Some(next) = state.input[state.cursor_position..].chars().next() {
            state.cursor_position += next.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Set an informational status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some(StatusMessage {
            text: msg,
            is_error: false,
            created: Instant::now(),
        });
    }

    /// Set an error status message with current timestamp.
    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some(StatusMessage {
            text: msg,
            is_error: true,
            created: Instant::now(),
        });
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some(ref status) = self.status_message {
            if status.created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Move the cursor down by one row.
    pub fn select_next(&mut self) {
        let len = self.tree_state.flat_items.len();
        if len > 0 && self.tree_state.cursor < len - 1 {
            self.tree_state.cursor += 1;
        }
    }

    /// Move the cursor up by one row.
    pub fn select_previous(&mut self) {
        if self.tree_state.cursor > 0 {
            self.tree_state.cursor -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.tree_state.cursor = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.tree_state.flat_items.len();
        if len > 0 {
            self.tree_state.cursor = len - 1;
        }
    }

    pub fn expand_cursor(&mut self) {
        self.tree_state.expand_cursor();
    }

    pub fn collapse_cursor(&mut self) {
        self.tree_state.collapse_cursor();
    }

    /// Scroll the preview by one page.
    pub fn preview_page_down(&mut self) {
        self.preview.scroll_down(self.preview_height.max(1));
    }

    pub fn preview_page_up(&mut self) {
        self.preview.scroll_up(self.preview_height.max(1));
    }
}

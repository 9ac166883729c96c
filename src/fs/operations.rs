use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::Result;

/// Outcome of reading a note for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteContent {
    /// The path is not an existing file.
    Missing,
    /// File contents (invalid UTF-8 is replaced).
    Text(String),
    /// The file exists but could not be read.
    Unreadable(String),
}

/// Read a note for the preview panel. Never fails; problems are reported in
/// the returned value.
pub fn read_note(path: &Path) -> NoteContent {
    if !path.is_file() {
        return NoteContent::Missing;
    }
    match fs::read(path) {
        Ok(bytes) => NoteContent::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => NoteContent::Unreadable(e.to_string()),
    }
}

/// Create a directory (and its parents) if it does not exist yet.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
        tracing::info!(dir = %path.display(), "created notes directory");
    }
    Ok(())
}

/// Create a new Markdown note in `base_dir` and return its path.
///
/// The file is named `YYYYMMDD_HHMMSS_<title>.md` and starts with a heading
/// and a creation timestamp. An existing file of that name is left untouched
/// and reported as [`std::io::ErrorKind::AlreadyExists`].
pub fn create_note(base_dir: &Path, title: &str, now: NaiveDateTime) -> Result<PathBuf> {
    ensure_dir(base_dir)?;

    let file_name = format!(
        "{}_{}.md",
        now.format("%Y%m%d_%H%M%S"),
        clean_title(title)
    );
    let path = base_dir.join(file_name);

    let content = format!(
        "# {}\n\nCreated: {}\n\n---\n\n",
        title,
        now.format("%Y-%m-%d %H:%M:%S")
    );
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)?;
    file.write_all(content.as_bytes())?;
    tracing::info!(path = %path.display(), "created note");
    Ok(path)
}

/// Turn a free-form title into something safe for a file name.
///
/// Characters that are invalid in file names on common platforms become `_`.
/// A blank result becomes `untitled`.
pub fn clean_title(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

//! File logging for the TUI.
//!
//! The terminal is owned by the UI, so events go to a log file instead of
//! stderr. `RUST_LOG` controls the filter and defaults to `info`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{AppError, Result};

/// `<state dir>/notetree/notetree.log`, falling back to the local data dir.
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("notetree")
        .join("notetree.log")
}

/// Install the global subscriber, appending to `log_path`.
pub fn init(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(log_path)?;
    build_subscriber(file)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

/// Subscriber writing plain-text events to `log_file`.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}

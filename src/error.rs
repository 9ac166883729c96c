use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A tree operation was called on a node that cannot support it.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Preferences could not be serialized.
    #[error("Config error: {0}")]
    Config(#[from] toml::ser::Error),

    /// An external editor or opener could not be launched.
    #[error("Launch failed: {0}")]
    Launch(String),

    /// The log subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn invalid_operation_display() {
        let err = AppError::InvalidOperation("cannot attach to a document".into());
        assert_eq!(
            err.to_string(),
            "Invalid operation: cannot attach to a document"
        );
    }

    #[test]
    fn launch_error_display() {
        let err = AppError::Launch("no editor binary configured".into());
        assert_eq!(err.to_string(), "Launch failed: no editor binary configured");
    }
}

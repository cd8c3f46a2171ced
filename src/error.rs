use thiserror::Error;

use crate::host::HostError;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or log file setup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid configuration or logging setup.
    #[error("Config error: {0}")]
    Config(String),

    /// Failure reported by the host shell.
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

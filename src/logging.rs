use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Install the tracing subscriber, writing to `log_file`.
///
/// The terminal belongs to the UI, so without a log file no subscriber is
/// installed and events are discarded. The filter comes from `RUST_LOG`,
/// defaulting to `info`.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Config(format!("failed to install logger: {e}")))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_log_file_is_a_noop() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn unwritable_log_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory cannot be opened as the log file.
        let err = init(Some(dir.path())).expect_err("should fail");
        assert!(matches!(err, AppError::Io(_)));
    }
}

//! Error types for CLI operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// One or more reports failed during `collect`
    #[error("{failed} of 3 reports failed: {reports}")]
    Collection { failed: usize, reports: String },

    /// Sink could not be built or closed
    #[error("OpenTSDB sink error: {message}")]
    Sink { message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }
}

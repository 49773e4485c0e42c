//! Error types for the console toolkit

use crate::config::ConfigError;
use thiserror::Error;

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the console toolkit
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported terminal: {0}")]
    UnsupportedTerminal(String),

    #[error("Cancelled by user")]
    UserCancelled,

    #[error("Step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Invalid widget configuration: {0}")]
    InvalidWidget(String),

    #[error("Workflow '{0}' not found")]
    WorkflowNotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether this error is the user interrupting the session
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::UserCancelled)
    }
}

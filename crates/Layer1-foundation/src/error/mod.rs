//! Error types for Plugsmith
//!
//! Every failure of the publish and run flows maps onto one variant here.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Plugsmith error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Input
    // ========================================================================
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // External commands
    // ========================================================================
    #[error("Error running '{command}': {message}")]
    Command { command: String, message: String },

    #[error("Failed to launch host: {0}")]
    Launch(String),

    // ========================================================================
    // Filesystem
    // ========================================================================
    #[error("Error setting {} to executable: {message}", path.display())]
    Permission { path: PathBuf, message: String },

    #[error("Error copying {}: {message}", path.display())]
    Copy { path: PathBuf, message: String },

    #[error("Watch error: {0}")]
    Watch(String),

    // ========================================================================
    // External error conversions
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error is a plain usage message rather than a failure
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Whether the error must terminate the whole tool
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Launch(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn command(command: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Error::Command {
            command: command.into(),
            message: message.to_string(),
        }
    }

    pub fn copy(path: impl AsRef<Path>, message: impl std::fmt::Display) -> Self {
        Error::Copy {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn permission(path: impl AsRef<Path>, message: impl std::fmt::Display) -> Self {
        Error::Permission {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }
}

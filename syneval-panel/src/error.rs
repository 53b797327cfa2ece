//! Error types for syneval-panel
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation.

use thiserror::Error;

/// Main error type for the evaluation panel
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Task file loading or parsing errors
    #[error("Task file error: {0}")]
    TaskFile(String),

    /// Clip playback errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// Session page flow errors
    #[error("Session error: {0}")]
    Session(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the panel Error
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for chantview

use std::io;
use thiserror::Error;

/// Main error type for chantview
#[derive(Error, Debug)]
pub enum ChantError {
    #[error("Document error: {0}")]
    Document(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("JSON error: {0}")]
    Json(String),

    /// User-supplied input that cannot be acted on (bad page entry, unknown command)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for chantview operations
pub type Result<T> = std::result::Result<T, ChantError>;

impl From<String> for ChantError {
    fn from(s: String) -> Self {
        ChantError::Other(s)
    }
}

impl From<&str> for ChantError {
    fn from(s: &str) -> Self {
        ChantError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for ChantError {
    fn from(e: serde_json::Error) -> Self {
        ChantError::Json(e.to_string())
    }
}

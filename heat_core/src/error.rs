//! Error types for the heat_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for heat_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A row of an entry file could not be turned into a swimmer
    #[error("Import error on line {line}: {message}")]
    Import { line: u64, message: String },

    /// Heats cannot be drawn without at least one lane
    #[error("Invalid lane count: {0} (must be at least 1)")]
    InvalidLaneCount(usize),

    /// Heat sheet report error
    #[error("Report error: {0}")]
    Report(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn import(line: u64, message: impl Into<String>) -> Self {
        Error::Import {
            line,
            message: message.into(),
        }
    }
}

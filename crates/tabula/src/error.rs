//! Error types for the Tabula library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tabula operations.
#[derive(Debug, Error)]
pub enum TabulaError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File format not supported by the loader.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty document or no text to process.
    #[error("Empty document: {0}")]
    EmptyDocument(String),

    /// The oracle was unreachable or its API rejected the request.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Tabula operations.
pub type Result<T> = std::result::Result<T, TabulaError>;

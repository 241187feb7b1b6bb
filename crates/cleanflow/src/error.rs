//! Error types for the CleanFlow library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for CleanFlow operations.
///
/// Parsing, serialization, validation and rule lookup never produce this
/// error; it covers file access, metadata decoding and edit-session misuse.
#[derive(Debug, Error)]
pub enum CleanflowError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DQ metadata attached to a row could not be decoded.
    #[error("Invalid DQ metadata for row '{row_id}': {message}")]
    Metadata { row_id: String, message: String },

    /// The column cannot be edited in a quarantine session.
    #[error("Column '{0}' is read-only")]
    ReadOnlyColumn(String),

    /// No cell exists at the given address.
    #[error("No cell at row '{row_id}', column '{column}'")]
    UnknownCell { row_id: String, column: String },

    /// An edit was attempted while no cell is active.
    #[error("No cell is active for editing")]
    NoActiveCell,

    /// Error saving or loading session state.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl CleanflowError {
    pub(crate) fn unknown_cell(row_id: &str, column: &str) -> Self {
        CleanflowError::UnknownCell {
            row_id: row_id.to_string(),
            column: column.to_string(),
        }
    }
}

/// Result type alias for CleanFlow operations.
pub type Result<T> = std::result::Result<T, CleanflowError>;

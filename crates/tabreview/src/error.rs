//! Error types for the review engine.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// No field qualified as an image column; the dataset was not activated.
    #[error("No image column found: expected a field whose name mentions an image or URL and whose values look like image references")]
    NoImageColumn,

    /// A batch operation was requested with no selected images.
    #[error("Nothing selected")]
    NothingSelected,

    /// The input held no header line.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// An operation was requested before any dataset was loaded.
    #[error("No dataset loaded")]
    NoDataset,

    /// A (row, image column) reference that does not belong to the active dataset.
    #[error("Unknown cell: row {row}, column {column}")]
    UnknownCell { row: usize, column: usize },

    /// A field name that is not part of the field schema (or not filterable).
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Error reading or writing a file on behalf of a host.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for review operations.
pub type Result<T> = std::result::Result<T, ReviewError>;

//! Correction table errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a city correction table.
#[derive(Debug, Error)]
pub enum CorrectionError {
    /// The table file could not be read.
    #[error("failed to read correction table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table is not a JSON array of `{from, to}` objects.
    #[error("invalid correction table: {0}")]
    Json(#[from] serde_json::Error),

    /// An entry would match the empty string.
    #[error("correction #{index} has an empty `from` value")]
    EmptyFrom { index: usize },
}

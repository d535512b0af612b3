//! Error types for the lattice crate

use thiserror::Error;

/// Result type for lattice operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the lattice crate
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Level file that parsed but violates the lattice invariants
    #[error("invalid level {path}: {reason}")]
    InvalidLevel { path: String, reason: String },
}

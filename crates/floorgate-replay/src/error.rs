//! Error types for floorgate-replay

use thiserror::Error;

/// Persistence error type
#[derive(Debug, Error)]
pub enum Error {
    /// Record not found
    #[error("record not found: {0}")]
    NotFound(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for vetsync-core

use thiserror::Error;

/// Result type alias using vetsync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vetsync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown content kind
    #[error("Unknown content kind: {0}")]
    UnknownContentKind(String),
}

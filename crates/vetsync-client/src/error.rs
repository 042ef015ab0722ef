//! Error types for vetsync-client

use thiserror::Error;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the network layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Core validation or configuration error
    #[error(transparent)]
    Core(#[from] vetsync_core::Error),

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Response or push payload did not match the expected shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

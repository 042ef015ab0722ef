use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] vetsync_core::Error),
    #[error(transparent)]
    Client(#[from] vetsync_client::ClientError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
    #[error("Not logged in. Run `vetsync auth login --token <TOKEN>` first.")]
    NotLoggedIn,
    #[error("Configuration error: {0}")]
    Config(String),
}

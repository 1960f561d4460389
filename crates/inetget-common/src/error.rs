//! Shared error type for plumbing that doesn't belong to one protocol client.

use thiserror::Error;

/// Result type alias used across the workspace's ambient stack.
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors that can occur in shared, non-protocol-specific plumbing.
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl CommonError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

//! Error types for the `inetget` CLI binary.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-level errors: argument/config-file parsing and I/O around them.
/// Transfer-core failures arrive wrapped in [`CliError::Core`].
#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] inetget_core::error::CoreError),

    #[error(transparent)]
    Common(#[from] inetget_common::error::CommonError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

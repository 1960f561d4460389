//! The error taxonomy shared across protocols (spec §7).

use thiserror::Error;

/// Result type alias used across the transfer core.
pub type Result<T> = std::result::Result<T, CoreError>;

/// One variant per error kind named in the spec's error taxonomy.
///
/// Every variant carries a human-readable detail string; only
/// [`CoreError::ConnectFailed`] and [`CoreError::TimeoutConnect`] are
/// recovered locally by the retry governor ([`CoreError::is_retriable`]).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported URL scheme: {0}")]
    UrlUnsupported(String),

    #[error("connection failed: {0}")]
    ConnectFailed(String),

    #[error("request rejected: {0}")]
    RequestRejected(String),

    #[error("TLS policy violation: {0}")]
    TlsPolicy(String),

    #[error("connect timed out: {0}")]
    TimeoutConnect(String),

    #[error("receive timed out: {0}")]
    TimeoutReceive(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("could not open sink: {0}")]
    SinkOpenFailed(String),

    #[error("aborted by user")]
    UserAbort,

    #[error("internal provider error: {0}")]
    ProviderInternal(String),
}

impl CoreError {
    /// Whether the retry governor (spec §4.1.3) should re-attempt `open`
    /// after this error. Only connection-establishment failures are
    /// recovered automatically; anything past that point (rejected
    /// requests, TLS policy, mid-stream failures) is final.
    pub fn is_retriable(&self) -> bool {
        matches!(self, CoreError::ConnectFailed(_) | CoreError::TimeoutConnect(_))
    }

    /// Whether this error should stay silent and skip the audible-failure
    /// cue (spec §7: "`UserAbort` is always terminal and quiet").
    pub fn is_quiet(&self) -> bool {
        matches!(self, CoreError::UserAbort)
    }
}

//! Protocol clients (spec §4.1): `HttpClient` and `FtpClient` behind one
//! polymorphic `Client` trait, plus the shared retry governor.

mod ftp;
mod http;
mod retry;

pub use ftp::FtpClient;
pub use http::HttpClient;
pub use retry::with_retry;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::listener::StatusListener;
use crate::types::{ClientMeta, Params, Url, Verb};

/// Shared lifecycle implemented by every protocol binding (spec §4.1).
///
/// `open`/`result`/`read_data`/`close` are called in that order exactly
/// once per transfer attempt; `add_listener` may be called any number of
/// times before `open`.
#[async_trait]
pub trait Client: Send {
    /// Establish the connection and send the request. The retry governor
    /// (spec §4.1.3) wraps this call, not the trait method itself, so
    /// implementations only need to report whether a given failure is
    /// retriable via the returned `CoreError`.
    async fn open(
        &mut self,
        verb: Verb,
        url: &Url,
        post_body: &[u8],
        referrer: &str,
        if_modified_since_ts: i64,
    ) -> Result<()>;

    /// Read response headers / FTP metadata into a [`ClientMeta`].
    async fn result(&mut self) -> Result<ClientMeta>;

    /// Read up to `buf.len()` bytes. Returns `(n_read, eof)`.
    async fn read_data(&mut self, buf: &mut [u8]) -> Result<(usize, bool)>;

    /// Release provider resources. Must be safe to call more than once
    /// and on a partially-constructed client.
    async fn close(&mut self);

    /// Register a diagnostic sink. Dispatch across listeners happens in
    /// registration order.
    fn add_listener(&mut self, listener: Arc<dyn StatusListener>);

    /// Last human-readable error text, for diagnostic display.
    fn get_error_text(&self) -> String;

    /// Short provider name, used in log/tracing spans (`"http"`, `"ftp"`).
    fn name(&self) -> &'static str;
}

/// Builds the concrete client for a URL's scheme. FTP rejects any verb
/// other than GET at construction, matching spec §4.1.2.
pub fn build_client(url: &Url, params: &Params) -> Result<Box<dyn Client>> {
    use crate::error::CoreError;
    use crate::types::Scheme;

    match url.scheme {
        Scheme::Http | Scheme::Https => Ok(Box::new(HttpClient::new(params.clone()))),
        Scheme::Ftp => {
            if params.verb != Verb::Get {
                return Err(CoreError::InvalidArgument(
                    "FTP only supports the GET verb".into(),
                ));
            }
            Ok(Box::new(FtpClient::new(params.clone())))
        }
    }
}

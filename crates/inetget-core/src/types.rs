//! The data model (spec §3): `Url`, `Params`, transfer state, client metadata.

/// URL scheme supported by the transfer core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
    Ftp,
}

impl Scheme {
    /// Default port for the scheme when the URL doesn't specify one.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
            Scheme::Ftp => 21,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Ftp => "ftp",
        }
    }
}

/// Immutable, parsed representation of the target URL.
#[derive(Debug, Clone)]
pub struct Url {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub path: String,
    pub query: Option<String>,
}

impl Url {
    /// A URL is "complete" when the scheme is supported and a host is
    /// present — the minimum needed to attempt a connection.
    pub fn is_complete(&self) -> bool {
        !self.host.is_empty()
    }

    /// Path plus query, suitable for building a request line.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.path, q),
            _ => self.path.clone(),
        }
    }

    /// Rebuilds a displayable URL string (used in progress rendering and
    /// diagnostic messages). Credentials are never included.
    pub fn display(&self) -> String {
        let default_port = self.scheme.default_port();
        if self.port == default_port {
            format!("{}://{}{}", self.scheme.as_str(), self.host, self.path_and_query())
        } else {
            format!(
                "{}://{}:{}{}",
                self.scheme.as_str(),
                self.host,
                self.port,
                self.path_and_query()
            )
        }
    }
}

/// HTTP verb. FTP only honors `Get`; anything else is rejected at `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Head => "HEAD",
        }
    }
}

/// The post body source: literal bytes, or "read one line from stdin".
#[derive(Debug, Clone)]
pub enum PostData {
    None,
    Literal(Vec<u8>),
    Stdin,
}

/// Immutable configuration driving one transfer (spec §3).
#[derive(Debug, Clone)]
pub struct Params {
    pub verb: Verb,
    pub post_data: PostData,
    pub disable_proxy: bool,
    pub user_agent: String,
    pub disable_redir: bool,
    pub insecure: bool,
    pub force_crl: bool,
    pub timeout_connect_s: i64,
    pub timeout_receive_s: i64,
    pub retry_count: u32,
    pub referrer: String,
    pub set_file_time: bool,
    pub update_mode: bool,
    pub keep_failed: bool,
    pub notify: bool,
    pub verbose: bool,
    /// `[SUPPLEMENT]` byte-range start, 0 ⇒ unset (spec §4.1.1).
    pub range_start: u64,
    /// `[SUPPLEMENT]` byte-range end, `SIZE_UNKNOWN` ⇒ open-ended.
    pub range_end: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            verb: Verb::Get,
            post_data: PostData::None,
            disable_proxy: false,
            user_agent: String::new(),
            disable_redir: false,
            insecure: false,
            force_crl: false,
            timeout_connect_s: -1,
            timeout_receive_s: -1,
            retry_count: 3,
            referrer: String::new(),
            set_file_time: false,
            update_mode: false,
            keep_failed: false,
            notify: false,
            verbose: false,
            range_start: 0,
            range_end: SIZE_UNKNOWN,
        }
    }
}

/// Sentinel meaning "size not known" (spec §3).
pub const SIZE_UNKNOWN: u64 = u64::MAX;

/// Sentinel meaning "timestamp not known" (spec §3). Chosen so it can never
/// collide with a real epoch-seconds value.
pub const TIME_UNKNOWN: i64 = i64::MIN;

/// Response metadata produced by `Client::result` (spec §3).
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub success: bool,
    pub status_code: u32,
    pub file_size: u64,
    pub last_modified_ts: i64,
    pub content_type: String,
    pub content_encoding: String,
}

impl Default for ClientMeta {
    fn default() -> Self {
        Self {
            success: false,
            status_code: 0,
            file_size: SIZE_UNKNOWN,
            last_modified_ts: TIME_UNKNOWN,
            content_type: String::new(),
            content_encoding: String::new(),
        }
    }
}

/// Lifetime-scoped state for one orchestrator invocation (spec §3).
#[derive(Debug)]
pub struct TransferState {
    pub total_bytes: u64,
    pub transferred_bytes: u64,
    pub current_rate: f64,
    pub eof_flag: bool,
    pub spinner_index: u8,
}

impl Default for TransferState {
    fn default() -> Self {
        Self {
            total_bytes: 0,
            transferred_bytes: 0,
            current_rate: f64::NAN,
            eof_flag: false,
            spinner_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_display_omitted() {
        let url = Url {
            scheme: Scheme::Https,
            host: "example.com".into(),
            port: 443,
            user: None,
            password: None,
            path: "/a.bin".into(),
            query: None,
        };
        assert_eq!(url.display(), "https://example.com/a.bin");
    }

    #[test]
    fn non_default_port_included() {
        let url = Url {
            scheme: Scheme::Http,
            host: "example.com".into(),
            port: 8080,
            user: None,
            password: None,
            path: "/a.bin".into(),
            query: Some("x=1".into()),
        };
        assert_eq!(url.display(), "http://example.com:8080/a.bin?x=1");
    }

    #[test]
    fn incomplete_url_has_no_host() {
        let url = Url {
            scheme: Scheme::Http,
            host: String::new(),
            port: 80,
            user: None,
            password: None,
            path: String::new(),
            query: None,
        };
        assert!(!url.is_complete());
    }
}

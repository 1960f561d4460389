//! Command-line surface (spec §6): one flat flag set plus two positionals,
//! `<source_url>` and `<output_file>`.

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

/// INetGet — fetch one resource over HTTP, HTTPS, or FTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "inetget")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source URL (http://, https://, or ftp://).
    pub source_url: String,

    /// Output file. `-` writes to standard output, `NUL` discards the body.
    pub output_file: String,

    /// Verb override (GET/POST/PUT/DELETE/HEAD). Defaults to GET.
    #[arg(long)]
    pub verb: Option<String>,

    /// Post body; `-` reads one line from standard input.
    #[arg(long)]
    pub data: Option<String>,

    /// Disable the system proxy for this transfer.
    #[arg(long = "no-proxy")]
    pub no_proxy: bool,

    /// User-agent override.
    #[arg(long)]
    pub agent: Option<String>,

    /// Disable HTTP redirect following.
    #[arg(long = "no-redir")]
    pub no_redir: bool,

    /// Ignore TLS certificate errors.
    #[arg(long)]
    pub insecure: bool,

    /// Require a successful CRL fetch.
    #[arg(long = "force-crl")]
    pub force_crl: bool,

    /// Referrer header.
    #[arg(long = "refer")]
    pub referrer: Option<String>,

    /// Connect timeout, seconds.
    #[arg(long = "time-cn")]
    pub time_connect: Option<i64>,

    /// Receive timeout, seconds.
    #[arg(long = "time-rc")]
    pub time_receive: Option<i64>,

    /// Shorthand setting both timeouts at once.
    #[arg(long)]
    pub timeout: Option<i64>,

    /// Maximum retries (default 3).
    #[arg(long)]
    pub retry: Option<u32>,

    /// Alias for `--retry=0`.
    #[arg(long = "no-retry")]
    pub no_retry: bool,

    /// Propagate Last-Modified to the output file's mtime.
    #[arg(long = "set-ftime")]
    pub set_ftime: bool,

    /// Conditional GET using the local output file's mtime.
    #[arg(long)]
    pub update: bool,

    /// Keep partial output on failure, as `<output>.partial`.
    #[arg(long = "keep-failed")]
    pub keep_failed: bool,

    /// Audible completion cue.
    #[arg(long)]
    pub notify: bool,

    /// Load additional flags from a config file (same grammar, `#` comments).
    #[arg(long)]
    pub config: Option<String>,

    /// Raise listener emission verbosity.
    #[arg(short, long)]
    pub verbose: bool,

    /// Resolved retry count, honoring whichever of `--retry`/`--no-retry`
    /// occurred later on the command line (SPEC_FULL.md §6). Not a clap
    /// argument itself; filled in by [`resolve_retry_count`] right after
    /// parsing. `None` means neither flag appeared at this parse stage.
    #[arg(skip)]
    pub effective_retry: Option<u32>,
}

impl Cli {
    /// Parses from `std::env::args_os()`, resolves `--retry`/`--no-retry`
    /// occurrence order, then fills in any flag not given on the command
    /// line from `--config`'s file, per SPEC_FULL.md §4.7.
    pub fn parse_with_config() -> crate::error::Result<Self> {
        let matches = Cli::command().get_matches();
        let mut cli = Cli::from_arg_matches(&matches)
            .map_err(|e| crate::error::CliError::InvalidArgument(e.to_string()))?;
        cli.effective_retry = resolve_retry_count(&matches);
        match cli.config.clone() {
            Some(path) => crate::config::merge_with_config_file(cli, &path),
            None => Ok(cli),
        }
    }
}

/// Resolves `--retry N` vs. `--no-retry` by whichever occurred later in
/// `matches` — a plain "last flag wins" rule that, unlike reading the two
/// booleans independently, respects the order the user actually typed them
/// in (SPEC_FULL.md §6). `None` when neither flag is present.
pub(crate) fn resolve_retry_count(matches: &ArgMatches) -> Option<u32> {
    let retry_idx = matches.index_of("retry");
    let no_retry_idx = matches.index_of("no_retry");
    match (retry_idx, no_retry_idx) {
        (Some(r), Some(n)) if n > r => Some(0),
        (Some(_), _) => matches.get_one::<u32>("retry").copied(),
        (None, Some(_)) => Some(0),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_positional_args() {
        let cli = Cli::parse_from(["inetget", "http://example.com/f", "out.bin"]);
        assert_eq!(cli.source_url, "http://example.com/f");
        assert_eq!(cli.output_file, "out.bin");
        assert_eq!(cli.verb, None);
        assert_eq!(cli.retry, None);
    }

    #[test]
    fn parses_long_flags() {
        let cli = Cli::parse_from([
            "inetget",
            "--insecure",
            "--retry=5",
            "--agent=Test/1.0",
            "https://example.com/f",
            "-",
        ]);
        assert!(cli.insecure);
        assert_eq!(cli.retry, Some(5));
        assert_eq!(cli.agent.as_deref(), Some("Test/1.0"));
        assert_eq!(cli.output_file, "-");
    }
}

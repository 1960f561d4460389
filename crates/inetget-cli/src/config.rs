//! Config-file loading (SPEC_FULL.md §4.7): `--config=<p>` fills in any
//! flag not already set on the command line, one directive per line.

use clap::{CommandFactory, FromArgMatches};
use std::path::Path;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Parses `path` into a flag-argument vector (ignoring blank lines and
/// `#`-comments), then re-parses `cli` with those directives appended —
/// clap's own "last wins" rule for repeated flags means `cli`'s own
/// command-line values always win, since they were already applied before
/// the config file's tokens are layered on as a second pass over the same
/// `ArgMatches`.
pub fn merge_with_config_file(cli: Cli, path: &str) -> Result<Cli> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::Config(format!("{path}: {e}")))?;
    let directives = parse_directives(&text);

    // The command line's own `--retry`/`--no-retry` resolution (if any)
    // always wins over the config file, so it's carried through as-is
    // rather than re-derived from the merged argv below.
    let command_line_retry = cli.effective_retry;

    let mut argv: Vec<String> = vec!["inetget".to_string()];
    argv.push(cli.source_url.clone());
    argv.push(cli.output_file.clone());
    argv.extend(directives);
    argv.extend(command_line_flags(&cli));

    let matches = Cli::command()
        .try_get_matches_from(argv)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let mut merged = Cli::from_arg_matches(&matches).map_err(|e| CliError::Config(e.to_string()))?;
    merged.effective_retry = command_line_retry.or_else(|| crate::cli::resolve_retry_count(&matches));
    Ok(merged)
}

/// Extracts the non-empty, non-comment directive lines from config-file text.
fn parse_directives(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Re-serializes the flags the user actually set, so re-parsing the
/// combined argv applies the config file first and the command line's
/// own flags last (clap keeps the final occurrence of a flag).
fn command_line_flags(cli: &Cli) -> Vec<String> {
    let mut flags = Vec::new();
    if let Some(verb) = &cli.verb {
        flags.push(format!("--verb={verb}"));
    }
    if let Some(data) = &cli.data {
        flags.push(format!("--data={data}"));
    }
    if cli.no_proxy {
        flags.push("--no-proxy".into());
    }
    if let Some(agent) = &cli.agent {
        flags.push(format!("--agent={agent}"));
    }
    if cli.no_redir {
        flags.push("--no-redir".into());
    }
    if cli.insecure {
        flags.push("--insecure".into());
    }
    if cli.force_crl {
        flags.push("--force-crl".into());
    }
    if let Some(referrer) = &cli.referrer {
        flags.push(format!("--refer={referrer}"));
    }
    if let Some(t) = cli.time_connect {
        flags.push(format!("--time-cn={t}"));
    }
    if let Some(t) = cli.time_receive {
        flags.push(format!("--time-rc={t}"));
    }
    if let Some(t) = cli.timeout {
        flags.push(format!("--timeout={t}"));
    }
    if let Some(n) = cli.retry {
        flags.push(format!("--retry={n}"));
    }
    if cli.no_retry {
        flags.push("--no-retry".into());
    }
    if cli.set_ftime {
        flags.push("--set-ftime".into());
    }
    if cli.update {
        flags.push("--update".into());
    }
    if cli.keep_failed {
        flags.push("--keep-failed".into());
    }
    if cli.notify {
        flags.push("--notify".into());
    }
    if cli.verbose {
        flags.push("--verbose".into());
    }
    flags
}

/// Probes whether `path` names an existing local file, used by `--update`
/// to recover a local mtime.
pub fn local_mtime(path: &Path) -> Option<i64> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_directives_skips_blank_and_comment_lines() {
        let text = "# a comment\n\n--retry=5\n  \n--insecure\n";
        let directives = parse_directives(text);
        assert_eq!(directives, vec!["--retry=5", "--insecure"]);
    }

    #[test]
    fn merge_with_config_file_fills_unset_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("inetget.conf");
        std::fs::write(&config_path, "--retry=9\n--agent=FromConfig/1.0\n").unwrap();

        let cli = Cli::parse_from(["inetget", "http://example.com/f", "out.bin"]);
        let merged = merge_with_config_file(cli, config_path.to_str().unwrap()).unwrap();

        assert_eq!(merged.retry, Some(9));
        assert_eq!(merged.agent.as_deref(), Some("FromConfig/1.0"));
    }

    #[test]
    fn command_line_flag_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("inetget.conf");
        std::fs::write(&config_path, "--retry=9\n").unwrap();

        let cli = Cli::parse_from(["inetget", "--retry=2", "http://example.com/f", "out.bin"]);
        let merged = merge_with_config_file(cli, config_path.to_str().unwrap()).unwrap();

        assert_eq!(merged.retry, Some(2));
    }

    #[test]
    fn local_mtime_returns_none_for_missing_file() {
        assert!(local_mtime(Path::new("/no/such/file/here")).is_none());
    }
}

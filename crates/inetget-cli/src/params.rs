//! Translates a parsed [`crate::cli::Cli`] into the core's `Params` record
//! and the output-destination decision (spec §6: `-` ⇒ stdout, `NUL` ⇒
//! null, otherwise a file path).

use inetget_core::types::{Params, PostData, Verb};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Where the transfer body should land.
pub enum OutputTarget {
    File(String),
    Stdout,
    Null,
}

pub fn output_target(output_file: &str) -> OutputTarget {
    match output_file {
        "-" => OutputTarget::Stdout,
        "NUL" => OutputTarget::Null,
        path => OutputTarget::File(path.to_string()),
    }
}

fn parse_verb(raw: &str) -> Result<Verb> {
    match raw.to_ascii_uppercase().as_str() {
        "GET" => Ok(Verb::Get),
        "POST" => Ok(Verb::Post),
        "PUT" => Ok(Verb::Put),
        "DELETE" => Ok(Verb::Delete),
        "HEAD" => Ok(Verb::Head),
        other => Err(CliError::InvalidArgument(format!("unknown verb '{other}'"))),
    }
}

/// Builds the core's `Params` from the merged CLI flags. `--timeout`
/// applies to both individual timeouts unless one was already given
/// explicitly (SPEC_FULL.md §6).
pub fn build_params(cli: &Cli) -> Result<Params> {
    let verb = parse_verb(cli.verb.as_deref().unwrap_or("GET"))?;

    let post_data = match &cli.data {
        None => PostData::None,
        Some(d) if d == "-" => PostData::Stdin,
        Some(d) => PostData::Literal(d.clone().into_bytes()),
    };

    let timeout_connect_s = cli.time_connect.or(cli.timeout).unwrap_or(-1);
    let timeout_receive_s = cli.time_receive.or(cli.timeout).unwrap_or(-1);

    let retry_count = cli.effective_retry.unwrap_or(3);

    Ok(Params {
        verb,
        post_data,
        disable_proxy: cli.no_proxy,
        user_agent: cli.agent.clone().unwrap_or_default(),
        disable_redir: cli.no_redir,
        insecure: cli.insecure,
        force_crl: cli.force_crl,
        timeout_connect_s,
        timeout_receive_s,
        retry_count,
        referrer: cli.referrer.clone().unwrap_or_default(),
        set_file_time: cli.set_ftime,
        update_mode: cli.update,
        keep_failed: cli.keep_failed,
        notify: cli.notify,
        verbose: cli.verbose,
        ..Params::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli::parse_from_args(["inetget", "http://example.com/f", "out.bin"])
    }

    impl Cli {
        fn parse_from_args(args: impl IntoIterator<Item = &'static str>) -> Self {
            <Cli as clap::Parser>::parse_from(args)
        }
    }

    /// Parses `args` the way `Cli::parse_with_config` does, resolving
    /// `effective_retry` from the real `ArgMatches` occurrence order instead
    /// of leaving it at its `#[arg(skip)]` default.
    fn parse_with_retry(args: impl IntoIterator<Item = &'static str>) -> Cli {
        let matches = <Cli as clap::CommandFactory>::command()
            .try_get_matches_from(args)
            .unwrap();
        let mut cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches).unwrap();
        cli.effective_retry = crate::cli::resolve_retry_count(&matches);
        cli
    }

    #[test]
    fn output_target_recognizes_special_names() {
        assert!(matches!(output_target("-"), OutputTarget::Stdout));
        assert!(matches!(output_target("NUL"), OutputTarget::Null));
        assert!(matches!(output_target("a.bin"), OutputTarget::File(_)));
    }

    #[test]
    fn no_retry_after_retry_wins() {
        let cli = parse_with_retry([
            "inetget",
            "http://example.com/f",
            "out.bin",
            "--retry",
            "5",
            "--no-retry",
        ]);
        let params = build_params(&cli).unwrap();
        assert_eq!(params.retry_count, 0);
    }

    #[test]
    fn retry_after_no_retry_wins() {
        let cli = parse_with_retry([
            "inetget",
            "http://example.com/f",
            "out.bin",
            "--no-retry",
            "--retry",
            "5",
        ]);
        let params = build_params(&cli).unwrap();
        assert_eq!(params.retry_count, 5);
    }

    #[test]
    fn neither_retry_flag_defaults_to_three() {
        let params = build_params(&base_cli()).unwrap();
        assert_eq!(params.retry_count, 3);
    }

    #[test]
    fn timeout_shorthand_fills_both_when_unset() {
        let mut cli = base_cli();
        cli.timeout = Some(30);
        let params = build_params(&cli).unwrap();
        assert_eq!(params.timeout_connect_s, 30);
        assert_eq!(params.timeout_receive_s, 30);
    }

    #[test]
    fn explicit_timeout_wins_over_shorthand() {
        let mut cli = base_cli();
        cli.timeout = Some(30);
        cli.time_connect = Some(5);
        let params = build_params(&cli).unwrap();
        assert_eq!(params.timeout_connect_s, 5);
        assert_eq!(params.timeout_receive_s, 30);
    }

    #[test]
    fn stdin_post_data_marker_is_recognized() {
        let mut cli = base_cli();
        cli.data = Some("-".to_string());
        let params = build_params(&cli).unwrap();
        assert!(matches!(params.post_data, PostData::Stdin));
    }
}

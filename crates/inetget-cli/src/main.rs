//! INetGet — fetch one resource over HTTP, HTTPS, or FTP.

use std::process::ExitCode;
use std::sync::Arc;

use inetget_common::logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};
use inetget_core::listener::{ConsoleListener, StatusListener};
use inetget_core::orchestrator::run_transfer;
use inetget_core::sink::{FileSink, NullSink, Sink, StdOutSink};
use inetget_core::sync::AbortSignal;
use tracing::error;

use inetget_cli::cli::Cli;
use inetget_cli::params::{build_params, output_target, OutputTarget};
use inetget_cli::{config, console, notify, url as url_parser};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::parse_with_config() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::File)
            .format(LogFormat::Text)
            .log_file_prefix("inetget".to_string())
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::File)
            .format(LogFormat::Text)
            .log_file_prefix("inetget".to_string())
            .build()
    };
    let log_config = LogConfig::from_env().unwrap_or(log_config);
    let _ = init_logging(&log_config);

    let abort = AbortSignal::new();
    console::install_abort_handler(abort.clone());

    match run(&cli, &abort).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "inetget failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, abort: &AbortSignal) -> inetget_cli::Result<bool> {
    let url = url_parser::parse(&cli.source_url)?;
    let params = build_params(cli)?;

    let local_mtime = match output_target(&cli.output_file) {
        OutputTarget::File(ref path) if params.update_mode => config::local_mtime(std::path::Path::new(path)),
        _ => None,
    };

    let sink: Box<dyn Sink> = match output_target(&cli.output_file) {
        OutputTarget::File(path) => Box::new(FileSink::open(&path)?),
        OutputTarget::Stdout => Box::new(StdOutSink::open()?),
        OutputTarget::Null => Box::new(NullSink::new()),
    };

    let listener: Arc<dyn StatusListener> = Arc::new(ConsoleListener::new(abort.clone()));
    let title = console::TerminalTitle::new();

    let outcome = run_transfer(&url, &params, local_mtime, sink, listener, &title, abort).await;

    match outcome {
        Ok(outcome) => {
            if outcome.success {
                notify::notify_success(params.notify);
                Ok(true)
            } else {
                eprintln!("{}", outcome.message);
                eprintln!();
                notify::notify_failure(params.notify, outcome.quiet);
                Ok(false)
            }
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!();
            notify::notify_failure(params.notify, e.is_quiet());
            Ok(false)
        }
    }
}

//! The transfer orchestrator (spec §4.3/§4.4): composes `(Params, Url)` into
//! a `(Client, Sink)` pair and drives the streaming loop to completion.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::client::{build_client, with_retry};
use crate::error::{CoreError, Result};
use crate::listener::{StatusLevel, StatusListener};
use crate::progress::{self, ConsoleTitle, ProgressThrottle};
use crate::sink::Sink;
use crate::sync::AbortSignal;
use crate::timer::{RateEstimate, Timer};
use crate::types::{Params, TransferState, Url, SIZE_UNKNOWN, TIME_UNKNOWN};
use crate::urlencode;

const BUFFER_SIZE: usize = 16 * 1024;
const RATE_WINDOW_S: f64 = 0.5;

/// Outcome of one `run_transfer` invocation, already resolved to whether
/// the process should exit 0 or non-zero.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    /// Mirrors `CoreError::is_quiet` for the error that produced this
    /// outcome (spec §7: `UserAbort` is always terminal and quiet — no
    /// audible cue even with `--notify`). Always `false` for a success.
    pub quiet: bool,
}

impl Outcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            quiet: false,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            quiet: false,
        }
    }

    fn fail_from(error: &CoreError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            quiet: error.is_quiet(),
        }
    }
}

/// Resolves the post body per spec §4.3 step 1: `-` reads one line from
/// standard input, a literal is taken as-is, and a non-empty body is
/// form-URL-encoded.
pub fn compose_post_body(post_data: &crate::types::PostData) -> std::io::Result<Vec<u8>> {
    use crate::types::PostData;
    use std::io::BufRead;

    let raw = match post_data {
        PostData::None => Vec::new(),
        PostData::Literal(bytes) => bytes.clone(),
        PostData::Stdin => {
            let stdin = std::io::stdin();
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            line.into_bytes()
        }
    };

    if raw.is_empty() {
        Ok(raw)
    } else {
        Ok(urlencode::encode(&raw).into_bytes())
    }
}

/// Drives one full transfer: open, result, conditional-skip decision,
/// sink creation, and the streaming loop, per spec §4.3/§4.4.
#[instrument(skip(params, sink, listener, title, abort), fields(url = %url.display()))]
#[allow(clippy::too_many_arguments)]
pub async fn run_transfer(
    url: &Url,
    params: &Params,
    local_mtime: Option<i64>,
    mut sink: Box<dyn Sink>,
    listener: Arc<dyn StatusListener>,
    title: &dyn ConsoleTitle,
    abort: &AbortSignal,
) -> Result<Outcome> {
    if !url.is_complete() {
        return Err(CoreError::UrlUnsupported(format!(
            "unsupported or incomplete URL scheme: {}",
            url.scheme.as_str()
        )));
    }

    let post_body = compose_post_body(&params.post_data).map_err(|e| CoreError::ReadFailed(e.to_string()))?;

    let if_modified_since_ts = if params.update_mode {
        match local_mtime {
            Some(ts) => ts,
            None => {
                listener.on_status(
                    StatusLevel::Warn,
                    "update mode requested but local file is missing; proceeding unconditionally",
                );
                TIME_UNKNOWN
            }
        }
    } else {
        TIME_UNKNOWN
    };

    let mut client = build_client(url, params)?;
    client.add_listener(listener.clone());

    let verb = params.verb;
    let referrer = params.referrer.clone();
    let open_result = with_retry(params.retry_count, abort, &listener, || {
        client.open(verb, url, &post_body, &referrer, if_modified_since_ts)
    })
    .await;

    if let Err(e) = open_result {
        client.close().await;
        let _ = sink.abort(params.keep_failed);
        let quiet = e.is_quiet();
        return Ok(Outcome {
            quiet,
            ..Outcome::fail(format!("connection failed: {e}"))
        });
    }

    let meta = match client.result().await {
        Ok(meta) => meta,
        Err(e) => {
            client.close().await;
            let _ = sink.abort(params.keep_failed);
            let quiet = e.is_quiet();
            return Ok(Outcome {
                quiet,
                ..Outcome::fail(format!("could not read response: {e}"))
            });
        }
    };

    if params.update_mode && meta.status_code == 304 {
        client.close().await;
        let _ = sink.abort(false);
        listener.on_status(StatusLevel::Info, "local copy is up to date, skipped");
        return Ok(Outcome::ok("skipped (not modified)"));
    }

    let size_text = if meta.file_size == SIZE_UNKNOWN {
        "<N/A>".to_string()
    } else {
        meta.file_size.to_string()
    };
    let mtime_text = if meta.last_modified_ts == TIME_UNKNOWN {
        "<N/A>".to_string()
    } else {
        meta.last_modified_ts.to_string()
    };
    info!(
        status_code = meta.status_code,
        content_type = %meta.content_type,
        content_encoding = %meta.content_encoding,
        size = %size_text,
        last_modified = %mtime_text,
        "response received"
    );
    listener.on_status(
        StatusLevel::Info,
        &format!(
            "status {} — type={}, encoding={}, size={}, last-modified={}",
            meta.status_code, meta.content_type, meta.content_encoding, size_text, mtime_text
        ),
    );

    if !meta.success {
        client.close().await;
        let _ = sink.abort(params.keep_failed);
        return Ok(Outcome::fail(format!("server returned status {}", meta.status_code)));
    }

    let result = run_streaming_loop(
        client.as_mut(),
        sink.as_mut(),
        meta.file_size,
        url,
        &listener,
        title,
        abort,
    )
    .await;

    client.close().await;

    match result {
        Ok(_total_time) => {
            let mtime = if params.set_file_time && meta.last_modified_ts != TIME_UNKNOWN {
                Some(meta.last_modified_ts)
            } else {
                None
            };
            sink.close(mtime)?;
            Ok(Outcome::ok("download completed"))
        }
        Err(e) => {
            let _ = sink.abort(params.keep_failed);
            Ok(Outcome::fail_from(&e))
        }
    }
}

/// Runs the fixed-16KiB-buffer read/write loop until EOF or abort (spec
/// §4.4). Returns the elapsed wall time on success.
async fn run_streaming_loop(
    client: &mut dyn crate::client::Client,
    sink: &mut dyn Sink,
    file_size: u64,
    url: &Url,
    listener: &Arc<dyn StatusListener>,
    title: &dyn ConsoleTitle,
    abort: &AbortSignal,
) -> Result<f64> {
    let timer_start = Timer::start();
    let mut timer_transfer = Timer::start();
    let mut rate_estimate = RateEstimate::new();
    let mut state = TransferState::default();
    let mut throttle = ProgressThrottle::new();
    let mut buf = vec![0u8; BUFFER_SIZE];

    render(&mut state, file_size, url, title, &mut throttle, true);

    loop {
        if abort.is_set() {
            return Err(CoreError::UserAbort);
        }

        let (n, eof) = client.read_data(&mut buf).await?;

        if n > 0 {
            state.total_bytes += n as u64;
            state.transferred_bytes += n as u64;
            let interval = timer_transfer.query();
            if interval >= RATE_WINDOW_S {
                let rate = state.transferred_bytes as f64 / interval;
                state.current_rate = rate_estimate.update(rate);
                timer_transfer.reset();
                state.transferred_bytes = 0;
            }
            sink.write(&buf[..n])?;
        }

        state.eof_flag = eof;
        if abort.is_set() {
            return Err(CoreError::UserAbort);
        }
        state.spinner_index = state.spinner_index.wrapping_add(1);
        render(&mut state, file_size, url, title, &mut throttle, false);

        if eof {
            break;
        }
    }

    render(&mut state, file_size, url, title, &mut throttle, true);

    let total_time = timer_start.query();
    let average_rate = if total_time > 0.0 {
        state.total_bytes as f64 / total_time
    } else {
        state.total_bytes as f64
    };
    let summary = format!(
        "Download completed in {} (avg. rate: {}/s)",
        progress::format_duration(total_time),
        progress::format_bytes(average_rate as u64)
    );
    listener.on_status(StatusLevel::Info, &summary);

    Ok(total_time)
}

fn render(
    state: &mut TransferState,
    file_size: u64,
    url: &Url,
    title: &dyn ConsoleTitle,
    throttle: &mut ProgressThrottle,
    force: bool,
) {
    if !title.is_interactive() {
        return;
    }
    if !throttle.should_render(force) {
        return;
    }
    let line = progress::render_line(state, file_size);
    eprint!("\r{line}");
    let _ = std::io::Write::flush(&mut std::io::stderr());
    title.set_title(&progress::render_title(file_size, state.total_bytes, &url.display()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostData;

    #[test]
    fn compose_post_body_encodes_form_data() {
        let body = compose_post_body(&PostData::Literal(b"foo=bar baz".to_vec())).unwrap();
        assert_eq!(body, b"foo%3Dbar+baz");
    }

    #[test]
    fn compose_post_body_empty_stays_empty() {
        let body = compose_post_body(&PostData::None).unwrap();
        assert!(body.is_empty());
    }
}

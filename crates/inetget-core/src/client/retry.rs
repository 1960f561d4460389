//! Retry governor wrapping `Client::open` (spec §4.1.3).

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::error::{CoreError, Result};
use crate::listener::{StatusLevel, StatusListener};
use crate::sync::AbortSignal;

/// Runs `attempt` up to `retry_count + 1` times. A retriable error sleeps
/// one second (polling `abort` every 100ms so a user-abort interrupts the
/// wait) and emits a listener notification before retrying; a
/// non-retriable error or an exhausted retry budget returns immediately.
pub async fn with_retry<F, Fut>(
    retry_count: u32,
    abort: &AbortSignal,
    listener: &Arc<dyn StatusListener>,
    mut attempt: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    let max = retry_count + 1;
    for n in 1..=max {
        match attempt().await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_retriable() && n < max => {
                let message = format!("Request failed, retrying ({n}/{max})...");
                warn!(attempt = n, max, "{message}");
                listener.on_status(StatusLevel::Warn, &message);
                sleep_respecting_abort(abort, Duration::from_secs(1)).await;
                if abort.is_set() {
                    return Err(CoreError::UserAbort);
                }
            }
            Err(e) => return Err(e),
        }
    }
    unreachable!("loop always returns on its last iteration")
}

async fn sleep_respecting_abort(abort: &AbortSignal, total: Duration) {
    const TICK: Duration = Duration::from_millis(100);
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        if abort.is_set() {
            return;
        }
        let step = TICK.min(total - elapsed);
        tokio::time::sleep(step).await;
        elapsed += step;
    }
}

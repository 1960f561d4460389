//! Progress line rendering (spec §4.5): a single `\r`-updated terminal
//! line plus a console-title update in lockstep.
//!
//! Not built on `indicatif` — the exact format string, spinner cycling,
//! and "almost finished" ETA collapse are specified precisely enough that
//! a general-purpose progress-bar template would fight the spec rather
//! than express it, so the renderer is hand-rolled instead, in the style
//! of the corpus's own `format_bytes`-style loop-and-divide helpers.

use crate::types::{TransferState, SIZE_UNKNOWN};

const SPINNER_FRAMES: [char; 4] = ['-', '\\', '|', '/'];
const THROTTLE_MS: u128 = 200;
const ALMOST_FINISHED_THRESHOLD_S: f64 = 3.0;

/// Destination for the `INetGet [...] - <url>` console-title updates
/// (spec §4.5). Kept as a trait so `inetget-core` doesn't depend on a
/// concrete terminal crate; `inetget-cli` supplies the real backend.
pub trait ConsoleTitle {
    fn set_title(&self, title: &str);

    /// Whether progress rendering (title updates and the `\r`-line) should
    /// happen at all — skipped entirely on a non-TTY stdout, per
    /// SPEC_FULL.md §4.8. Defaults to `true`.
    fn is_interactive(&self) -> bool {
        true
    }
}

/// Discards every title update; used in tests and non-interactive runs.
pub struct NullConsoleTitle;

impl ConsoleTitle for NullConsoleTitle {
    fn set_title(&self, _title: &str) {}

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Formats bytes using binary prefixes (KiB/MiB/GiB/TiB) with one decimal
/// place, per spec §4.5.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[unit_idx])
    } else {
        format!("{:.1} {}", size, UNITS[unit_idx])
    }
}

/// Formats a duration in seconds as `HH:MM:SS` for durations of a minute
/// or more, else `X.Y sec` (spec §4.5).
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{:.1} sec", seconds)
    } else {
        let total = seconds.round() as u64;
        format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
    }
}

fn spinner_char(index: u8) -> char {
    SPINNER_FRAMES[(index % SPINNER_FRAMES.len() as u8) as usize]
}

/// Renders one progress line for the given state, without the throttling
/// decision — callers decide whether enough time has passed to render.
pub fn render_line(state: &TransferState, file_size: u64) -> String {
    let spin = spinner_char(state.spinner_index);

    if file_size == SIZE_UNKNOWN {
        return format!("[{spin}] {} received...", format_bytes(state.total_bytes));
    }

    let percent = if file_size == 0 {
        100
    } else {
        ((state.total_bytes as f64 / file_size as f64) * 100.0).min(100.0) as u64
    };
    let total = format_bytes(file_size);

    if state.current_rate.is_nan() {
        return format!("[{spin}] {percent}% of {total} received, please stand by...");
    }

    let rate = format_bytes(state.current_rate as u64);
    let remaining_bytes = file_size.saturating_sub(state.total_bytes);
    let eta_s = if state.current_rate > 0.0 {
        remaining_bytes as f64 / state.current_rate
    } else {
        f64::INFINITY
    };

    let eta = if eta_s <= ALMOST_FINISHED_THRESHOLD_S {
        "almost finished...".to_string()
    } else if eta_s.is_finite() {
        format!("{} remaining...", format_duration(eta_s))
    } else {
        "unknown time remaining...".to_string()
    };

    format!("[{spin}] {percent}% of {total} received, {rate}/s, {eta}")
}

/// Console-title text to pair with a given render (spec §4.5).
pub fn render_title(file_size: u64, total_bytes: u64, url: &str) -> String {
    if file_size == SIZE_UNKNOWN {
        format!("INetGet [{} received] - {url}", format_bytes(total_bytes))
    } else {
        let percent = if file_size == 0 {
            100
        } else {
            ((total_bytes as f64 / file_size as f64) * 100.0).min(100.0) as u64
        };
        format!("INetGet [{percent}% of {}] - {url}", format_bytes(file_size))
    }
}

/// Tracks the last-render instant so callers can apply the 200ms throttle
/// (spec §4.5) uniformly.
pub struct ProgressThrottle {
    last_render: Option<std::time::Instant>,
}

impl ProgressThrottle {
    pub fn new() -> Self {
        Self { last_render: None }
    }

    /// Whether a render is due now. `force` bypasses the throttle for the
    /// start/end renders the spec calls out explicitly.
    pub fn should_render(&mut self, force: bool) -> bool {
        let now = std::time::Instant::now();
        let due = force
            || self
                .last_render
                .map(|last| now.duration_since(last).as_millis() >= THROTTLE_MS)
                .unwrap_or(true);
        if due {
            self.last_render = Some(now);
        }
        due
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_uses_binary_prefixes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.0 GiB");
    }

    #[test]
    fn format_duration_switches_at_one_minute() {
        assert_eq!(format_duration(5.4), "5.4 sec");
        assert_eq!(format_duration(59.9), "59.9 sec");
        assert_eq!(format_duration(61.0), "00:01:01");
        assert_eq!(format_duration(3661.0), "01:01:01");
    }

    #[test]
    fn render_line_drops_percent_and_eta_when_size_unknown() {
        let mut state = TransferState::default();
        state.total_bytes = 2048;
        let line = render_line(&state, SIZE_UNKNOWN);
        assert!(line.contains("received..."));
        assert!(!line.contains('%'));
    }

    #[test]
    fn render_line_shows_stand_by_when_rate_is_nan() {
        let mut state = TransferState::default();
        state.total_bytes = 100;
        let line = render_line(&state, 1000);
        assert!(line.contains("please stand by..."));
    }

    #[test]
    fn render_line_collapses_short_eta() {
        let mut state = TransferState::default();
        state.total_bytes = 990;
        state.current_rate = 1000.0;
        let line = render_line(&state, 1000);
        assert!(line.contains("almost finished..."));
    }

    #[test]
    fn throttle_forces_first_render() {
        let mut throttle = ProgressThrottle::new();
        assert!(throttle.should_render(false));
    }
}

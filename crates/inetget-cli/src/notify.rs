//! Audible notification hook (SPEC_FULL.md §4.9): a terminal-bell write,
//! one bell on failure, two on success, silent when `--notify` is absent
//! or the failure is a quiet `UserAbort`.

use std::io::Write;

const BELL: &str = "\x07";

/// Rings the completion cue per SPEC_FULL.md §4.9's trigger points. No-op
/// when `enabled` is false.
pub fn notify_success(enabled: bool) {
    if !enabled {
        return;
    }
    ring(2);
}

/// Rings the failure cue, unless `quiet` (the failing error's
/// `CoreError::is_quiet`, e.g. `UserAbort`) says to stay silent.
pub fn notify_failure(enabled: bool, quiet: bool) {
    if !enabled || quiet {
        return;
    }
    ring(1);
}

// Written to stderr, not stdout: stdout may be the transfer body itself
// (`-o -`), and a bell byte spliced into it would break byte-exact delivery.
fn ring(count: usize) {
    let mut stderr = std::io::stderr();
    for _ in 0..count {
        let _ = stderr.write_all(BELL.as_bytes());
    }
    let _ = stderr.flush();
}

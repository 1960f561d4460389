//! Console / signal bootstrap (SPEC_FULL.md §4.8): Ctrl-C trapping and the
//! `crossterm`-backed console title, probed once against a non-TTY stdout.

use std::io::IsTerminal;

use inetget_core::progress::ConsoleTitle;
use inetget_core::sync::AbortSignal;

/// Installs a Ctrl-C/SIGINT handler that sets `signal` exactly once. A
/// second Ctrl-C while a transfer is already unwinding is a no-op, since
/// the flag is already set.
pub fn install_abort_handler(signal: AbortSignal) {
    let handler_signal = signal.clone();
    let _ = ctrlc::set_handler(move || {
        handler_signal.set();
    });
}

/// `crossterm`-backed console title. Skips the terminal escape entirely
/// when stdout isn't a TTY, since there is nothing to paint.
pub struct TerminalTitle {
    interactive: bool,
}

impl TerminalTitle {
    pub fn new() -> Self {
        Self {
            interactive: is_interactive(),
        }
    }
}

impl Default for TerminalTitle {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTitle for TerminalTitle {
    fn set_title(&self, title: &str) {
        if !self.interactive {
            return;
        }
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::SetTitle(title));
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Whether progress rendering should run at all — skipped on a non-TTY
/// stdout (redirected to a file or pipe), per SPEC_FULL.md §4.8.
pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_title_is_a_no_op() {
        let title = TerminalTitle { interactive: false };
        title.set_title("anything");
        assert!(!title.is_interactive());
    }
}

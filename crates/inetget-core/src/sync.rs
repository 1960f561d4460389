//! Sync primitives (spec §4/§5): the console mutex and the user-abort signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A process-wide, write-once, read-many abort flag (spec's "user-abort
/// signal"). Cloning shares the same underlying flag; setting it from any
/// clone is observed by all others immediately.
#[derive(Clone, Default)]
pub struct AbortSignal {
    flag: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request a cooperative shutdown. Idempotent.
    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Poll whether an abort has been requested.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_observed_across_clones() {
        let a = AbortSignal::new();
        let b = a.clone();
        assert!(!a.is_set());
        b.set();
        assert!(a.is_set());
    }
}

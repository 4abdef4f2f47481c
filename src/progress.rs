//! Cancellation signaling for long-running aggregation loops.
//!
//! The driving algorithm hands a token to the core; long loops poll it at
//! safe points and abort with an interruption error when it is raised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag. Cloning yields a handle to the same flag, so the
/// driving algorithm can keep one end and hand the other to the core.
#[derive(Debug, Clone, Default)]
pub struct InterruptToken {
    flag: Arc<AtomicBool>,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. All clones observe the interruption.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested.
    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Lower the flag so the token can be reused for the next pass.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

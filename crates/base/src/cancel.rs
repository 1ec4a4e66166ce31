use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A shared stop flag for pipeline cancellation.
///
/// All workers of a pipeline share the same flag. The owner calls `cancel()`
/// once during shutdown; every worker polls `is_cancelled()` once per loop
/// iteration and leaves its loop when it flips. The flag only gates loop
/// continuation, it never protects data.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    value: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.value.store(true, Ordering::Release);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }
}

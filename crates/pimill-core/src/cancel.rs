//! Shared stop flag polled by workers at chunk boundaries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle around the shared stop flag.
///
/// The flag is monotonic: it only ever moves from `false` to `true`. The
/// setter publishes with `Release` and pollers read with `Acquire`, so a
/// worker observing the flag also observes everything written before the
/// stop request.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Fresh handle with the flag cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request early termination. Safe to call from a signal handler; this
    /// is a single atomic store.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// True once a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

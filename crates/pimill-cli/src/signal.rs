//! SIGINT wiring: Ctrl-C flips the shared cancel flag, nothing else.
//!
//! Workers observe the flag at their next poll point and wind down without
//! emitting a result file.

use std::sync::OnceLock;

use pimill_core::CancelHandle;

static CANCEL: OnceLock<CancelHandle> = OnceLock::new();

/// Install the SIGINT handler for `handle`.
///
/// Repeated Ctrl-C presses keep setting the same monotonic flag. Only one
/// handle can ever be registered per process; later calls keep the first.
#[cfg(unix)]
pub fn install_sigint(handle: &CancelHandle) -> std::io::Result<()> {
    use nix::sys::signal::{self, SigHandler, Signal};

    extern "C" fn on_sigint(_signum: i32) {
        // Only async-signal-safe work here: a single atomic store.
        if let Some(handle) = CANCEL.get() {
            handle.request_stop();
        }
    }

    let _ = CANCEL.set(handle.clone());
    unsafe { signal::signal(Signal::SIGINT, SigHandler::Handler(on_sigint)) }
        .map(|_| ())
        .map_err(std::io::Error::from)
}

#[cfg(not(unix))]
pub fn install_sigint(handle: &CancelHandle) -> std::io::Result<()> {
    let _ = CANCEL.set(handle.clone());
    Ok(())
}

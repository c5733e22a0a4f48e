//! pi-Mill core: multi-precision pi computation.
//!
//! The centrepiece is the Chudnovsky pipeline: a precision planner, a
//! per-worker scratchpad of running factorials and powers, a term
//! calculator, static and dynamic work dispatch across OS threads, and a
//! finalizer that combines partial sums into pi. Around it sit the
//! Gauss-Legendre fallback, reference verification, staged result output
//! and a background system monitor.
//!
//! All high-precision arithmetic is `rug::Float` (MPFR) at an explicitly
//! planned working precision, rounding to nearest with ties to even.

pub mod cancel;
pub mod config;
pub mod diag;
pub mod dispatch;
pub mod error;
pub mod finalize;
pub mod gauss;
pub mod monitor;
pub mod output;
pub mod precision;
pub mod scratch;
pub mod term;
pub mod verify;

use std::sync::Arc;

pub use cancel::CancelHandle;
pub use config::{JobConfig, ScheduleMode};
pub use diag::Diag;
pub use dispatch::{Dispatcher, Phase, Progress};
pub use error::PiError;
pub use scratch::Scratchpad;
pub use verify::Verification;

/// Compute pi per `config` and return the decimal string `"3." + digits`.
///
/// Convenience wrapper over [`Dispatcher`] for callers that do not need
/// progress reporting or phase introspection.
pub fn compute_pi_decimal(config: &JobConfig, cancel: &CancelHandle) -> Result<String, PiError> {
    let progress = Arc::new(Progress::new());
    let sink = Arc::new(Diag::new(config.debug_level));
    let mut dispatcher = Dispatcher::new(config.clone(), progress, sink);
    let pi = dispatcher.run(cancel)?;
    Ok(finalize::format_pi(&pi, config.digits))
}

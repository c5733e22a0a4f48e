//! Mutex-guarded diagnostic sink shared by all worker threads.
//!
//! Diagnostics are a side channel: they read pipeline state but never feed
//! back into the computation. A single mutex serialises writes so
//! interleaved lines from concurrent workers stay whole.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

/// Progress and lifecycle messages.
pub const LEVEL_PROGRESS: u8 = 1;
/// Per-thread range assignments and working precision.
pub const LEVEL_RANGES: u8 = 2;
/// Per-worker partial sums and dynamic chunk claims.
pub const LEVEL_PARTIALS: u8 = 3;
/// Term-by-term values.
pub const LEVEL_TERMS: u8 = 4;

/// Leveled stderr sink. Level 0 is silent.
#[derive(Debug, Default)]
pub struct Diag {
    level: u8,
    console: Mutex<()>,
}

impl Diag {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            console: Mutex::new(()),
        }
    }

    /// The configured verbosity, 0..=4.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Write one diagnostic line if the sink is at least `level` verbose.
    pub fn emit(&self, level: u8, args: fmt::Arguments<'_>) {
        if self.level < level {
            return;
        }
        let _guard = match self.console.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut err = io::stderr();
        let _ = writeln!(err, "{args}");
    }
}

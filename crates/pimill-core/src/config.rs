//! Job configuration record passed by value to the dispatcher.
//!
//! There is no global configuration state: the caller builds a
//! [`JobConfig`], validates it, and hands it down together with the cancel
//! handle. The record is serde-derived so it can also be loaded from a
//! TOML file.

use serde::{Deserialize, Serialize};

use crate::error::PiError;
use crate::precision;

/// How term indices are handed to workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Contiguous ranges fixed at launch; no coordination afterwards.
    #[default]
    Static,
    /// Workers claim fixed-size chunks from a shared counter.
    Dynamic,
}

/// Default terms per claim in dynamic mode.
pub const DEFAULT_CHUNK_SIZE: u64 = 16;

/// Highest meaningful diagnostic level.
pub const MAX_DEBUG_LEVEL: u8 = 4;

/// Hardware cores minus one, never below one.
pub fn default_thread_count() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// Parameters of one Chudnovsky job. Validated before any worker launches.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Requested decimal places after "3.".
    pub digits: u64,
    /// Worker thread count.
    pub threads: usize,
    /// Static or dynamic dispatch.
    pub mode: ScheduleMode,
    /// Terms per claim in dynamic mode.
    pub chunk_size: u64,
    /// Guard bits on top of the digit-derived working precision.
    pub precision_buffer: u32,
    /// Diagnostic verbosity, 0..=4.
    pub debug_level: u8,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            digits: 1,
            threads: default_thread_count(),
            mode: ScheduleMode::Static,
            chunk_size: DEFAULT_CHUNK_SIZE,
            precision_buffer: precision::DEFAULT_PRECISION_BUFFER,
            debug_level: 0,
        }
    }
}

impl JobConfig {
    /// Default configuration for a digit count.
    pub fn for_digits(digits: u64) -> Self {
        Self {
            digits,
            ..Self::default()
        }
    }

    /// Reject bad parameters before launch.
    ///
    /// Digits and chunk size must be positive, the thread count positive
    /// and within hardware concurrency, the debug level 0..=4.
    pub fn validate(&self) -> Result<(), PiError> {
        if self.digits == 0 {
            return Err(PiError::InvalidInput(
                "decimal places must be positive".into(),
            ));
        }
        if self.threads == 0 {
            return Err(PiError::InvalidInput("thread count must be positive".into()));
        }
        let max_threads = num_cpus::get();
        if self.threads > max_threads {
            return Err(PiError::InvalidInput(format!(
                "thread count {} exceeds the {} available cores",
                self.threads, max_threads
            )));
        }
        if self.chunk_size == 0 {
            return Err(PiError::InvalidInput("chunk size must be positive".into()));
        }
        if self.debug_level > MAX_DEBUG_LEVEL {
            return Err(PiError::InvalidInput(format!(
                "debug level must be 0..={MAX_DEBUG_LEVEL}"
            )));
        }
        Ok(())
    }

    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, PiError> {
        toml::from_str(text).map_err(|e| PiError::InvalidInput(format!("config parse error: {e}")))
    }
}

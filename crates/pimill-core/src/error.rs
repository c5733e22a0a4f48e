//! Error taxonomy for the pi pipeline.
//!
//! `InvalidInput` and `PrecisionOverflow` are rejected synchronously,
//! before any worker launches. `Cancelled` is the distinguished status for
//! caller-initiated early termination and is neither a success nor a
//! failure in the usual sense. `Arithmetic` covers high-precision faults
//! that the pipeline invariants should make unreachable; callers treat it
//! as fatal.

use std::fmt;
use std::io;

/// Error type shared by every fallible path in the core.
#[derive(Debug)]
pub enum PiError {
    /// A caller-supplied parameter failed validation.
    InvalidInput(String),
    /// The precision planner exceeded the supported mantissa width.
    PrecisionOverflow {
        /// Bits the requested digit count would need.
        requested_bits: u64,
        /// Largest supported working precision.
        max_bits: u64,
    },
    /// The stop flag was observed set while the job was running.
    Cancelled,
    /// A high-precision operation reported a fault.
    Arithmetic(String),
    /// Reading or writing a file failed.
    Io(io::Error),
}

impl fmt::Display for PiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PiError::InvalidInput(message) => write!(f, "invalid input: {message}"),
            PiError::PrecisionOverflow {
                requested_bits,
                max_bits,
            } => write!(
                f,
                "requested precision of {requested_bits} bits exceeds the supported maximum of {max_bits} bits"
            ),
            PiError::Cancelled => write!(f, "calculation cancelled"),
            PiError::Arithmetic(message) => write!(f, "arithmetic fault: {message}"),
            PiError::Io(source) => write!(f, "i/o error: {source}"),
        }
    }
}

impl std::error::Error for PiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PiError::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for PiError {
    fn from(error: io::Error) -> Self {
        PiError::Io(error)
    }
}

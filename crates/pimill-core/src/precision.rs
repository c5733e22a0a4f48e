//! Precision planning: requested decimal places to working mantissa bits,
//! and the Chudnovsky term-count estimate.
//!
//! Every high-precision value in a run carries the planned precision, so a
//! miscalculation here silently corrupts trailing digits everywhere. The
//! buffer absorbs the rounding error accumulated over K(D) additions.

use crate::error::PiError;

/// Default guard bits on top of the digit-derived precision.
pub const DEFAULT_PRECISION_BUFFER: u32 = 20_000;

/// Largest supported working precision.
///
/// Besides bounding memory, this cap keeps 6*K(D) inside `u32` range, which
/// the scratchpad relies on for exact factorial initialisation and the
/// 640320-power fast path.
pub const MAX_PRECISION_BITS: u64 = 1 << 30;

/// Mantissa bits per decimal digit, rounded up from log2(10).
const BITS_PER_DIGIT: f64 = 3.322;

/// Decimal digits contributed by each Chudnovsky term.
const DIGITS_PER_TERM: f64 = 14.1816;

/// Working precision for `decimal_places` digits: ceil(D * 3.322) + buffer.
///
/// # Errors
///
/// `PrecisionOverflow` when the result would exceed [`MAX_PRECISION_BITS`].
pub fn precision_bits(decimal_places: u64, buffer: u32) -> Result<u32, PiError> {
    let bits = (decimal_places as f64 * BITS_PER_DIGIT).ceil() as u64 + u64::from(buffer);
    if bits > MAX_PRECISION_BITS {
        return Err(PiError::PrecisionOverflow {
            requested_bits: bits,
            max_bits: MAX_PRECISION_BITS,
        });
    }
    Ok(bits as u32)
}

/// Number of series terms needed for `decimal_places` digits.
///
/// Each term contributes a little over 14.18 digits; the division uses the
/// slightly conservative [`DIGITS_PER_TERM`] and one guard term is added,
/// so the estimate always lands at or past the first term contributing
/// less than 10^(-D).
pub fn estimate_required_k(decimal_places: u64) -> u64 {
    (decimal_places as f64 / DIGITS_PER_TERM).ceil() as u64 + 1
}

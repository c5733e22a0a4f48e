//! Gauss-Legendre (AGM) fallback.
//!
//! A handful of full-precision iterations, each roughly doubling the
//! number of correct digits. Single-threaded by nature; kept as the
//! default method for modest digit counts.

use rug::{Assign, Float};

use crate::cancel::CancelHandle;
use crate::error::PiError;
use crate::precision;

/// Mantissa bits for the AGM loop: four per digit plus slack.
pub fn gauss_precision_bits(decimal_places: u64) -> Result<u32, PiError> {
    let bits = (decimal_places + 5) * 4;
    if bits > precision::MAX_PRECISION_BITS {
        return Err(PiError::PrecisionOverflow {
            requested_bits: bits,
            max_bits: precision::MAX_PRECISION_BITS,
        });
    }
    Ok(bits as u32)
}

/// Iteration count: accuracy doubles per pass, so floor(log2 D) + 2 passes.
fn iterations_for(decimal_places: u64) -> u64 {
    (decimal_places as f64).log2() as u64 + 2
}

/// Compute pi via the arithmetic-geometric mean.
///
/// Polls the stop flag once per iteration; there are no other suspension
/// points.
pub fn calculate_pi(decimal_places: u64, cancel: &CancelHandle) -> Result<Float, PiError> {
    let prec = gauss_precision_bits(decimal_places)?;

    let mut a = Float::with_val(prec, 1);
    let mut b = Float::with_val(prec, 2u32).sqrt().recip();
    let mut t = Float::with_val(prec, 0.25f64);
    let mut p = Float::with_val(prec, 1);
    let mut tmp = Float::new(prec);

    for _ in 0..iterations_for(decimal_places) {
        if cancel.is_stop_requested() {
            return Err(PiError::Cancelled);
        }

        // a' = (a + b) / 2
        let a_next = Float::with_val(prec, &a + &b) / 2u32;
        // b' = sqrt(a b)
        let b_next = Float::with_val(prec, &a * &b).sqrt();
        // t' = t - p (a - a')^2
        tmp.assign(&a - &a_next);
        tmp.square_mut();
        tmp *= &p;
        t -= &tmp;
        // p' = 2p
        p *= 2u32;

        a = a_next;
        b = b_next;
    }

    // pi = (a + b)^2 / (4t)
    let mut numerator = Float::with_val(prec, &a + &b);
    numerator.square_mut();
    t *= 4u32;
    Ok(numerator / &t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_grows_with_digits() {
        assert_eq!(gauss_precision_bits(10).unwrap(), 60);
        assert_eq!(gauss_precision_bits(100).unwrap(), 420);
    }

    #[test]
    fn ten_digits_match_f64_pi() {
        let cancel = CancelHandle::new();
        let pi = calculate_pi(10, &cancel).unwrap();
        assert!((pi.to_f64() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn cancellation_is_observed_before_iterating() {
        let cancel = CancelHandle::new();
        cancel.request_stop();
        assert!(matches!(
            calculate_pi(100, &cancel),
            Err(PiError::Cancelled)
        ));
    }
}

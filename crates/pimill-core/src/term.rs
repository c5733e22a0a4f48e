//! The k-th Chudnovsky series term at working precision.
//!
//! Term_k = (-1)^k * (6k)! * (13591409 + 545140134*k)
//!          / ((3k)! * (k!)^3 * 640320^(3k))
//!
//! The 640320^(3/2) tail of the published series is factored out into the
//! finalizer constant 426880 * sqrt(10005), so the per-term power stays an exact
//! integer power.

use rug::{Assign, Float, Integer};

use crate::scratch::Scratchpad;

/// Constant offset of the linear factor.
pub const LINEAR_OFFSET: u64 = 13_591_409;
/// Per-term slope of the linear factor.
pub const LINEAR_SLOPE: u64 = 545_140_134;

/// Set `out` to Term_k at the scratchpad's precision.
///
/// The scratchpad's running state must reflect `k`; the caller advances it
/// afterwards. Every operation rounds to nearest, ties to even, at the
/// precision of its destination.
pub fn compute_term(out: &mut Float, k: u64, scratch: &mut Scratchpad) {
    debug_assert_eq!(scratch.k(), k, "scratchpad state does not reflect k");

    // The linear factor is evaluated in 128-bit integers before lifting;
    // 545140134*k overflows 64 bits near k = 3.4e10.
    let linear = u128::from(LINEAR_OFFSET) + u128::from(LINEAR_SLOPE) * u128::from(k);
    scratch.tmp.assign(Integer::from(linear));

    out.assign(&scratch.fact_6k);
    *out *= &scratch.tmp;
    *out /= &scratch.fact_3k;
    *out /= &scratch.fact_k_cubed;
    *out /= &scratch.power_640320;
    *out *= &scratch.power_neg1;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREC: u32 = 512;

    fn term_at(k: u64) -> Float {
        let mut scratch = Scratchpad::at(k, PREC);
        let mut out = Float::new(PREC);
        compute_term(&mut out, k, &mut scratch);
        out
    }

    #[test]
    fn term_zero_is_the_linear_offset() {
        // k = 0: all factorials and the power are 1, sign is +1.
        assert_eq!(term_at(0), 13_591_409);
    }

    #[test]
    fn term_one_matches_hand_computation() {
        // -(720 * 558731543) / (6 * 1 * 640320^3)
        let expected = -(720.0 * 558_731_543.0) / (6.0 * 2.62537412640768e17);
        let got = term_at(1).to_f64();
        assert!((got - expected).abs() < 1e-19, "got {got}");
    }

    #[test]
    fn terms_alternate_in_sign() {
        assert!(term_at(0) > 0);
        assert!(term_at(1) < 0);
        assert!(term_at(2) > 0);
        assert!(term_at(3) < 0);
    }

    #[test]
    fn successive_terms_shrink_by_fourteen_digits() {
        let ratio = (term_at(3).to_f64() / term_at(2).to_f64()).abs();
        assert!(ratio < 1e-13, "ratio {ratio}");
        assert!(ratio > 1e-15, "ratio {ratio}");
    }

    #[test]
    fn incremental_advance_matches_direct_init() {
        // Computing term 4 through three advances from k=1 must agree with
        // a scratchpad initialised directly at 4.
        let mut scratch = Scratchpad::at(1, PREC);
        let mut out = Float::new(PREC);
        for k in 1..4u64 {
            compute_term(&mut out, k, &mut scratch);
            scratch.advance();
        }
        compute_term(&mut out, 4, &mut scratch);
        assert_eq!(out, term_at(4));
    }
}

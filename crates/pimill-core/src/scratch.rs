//! Per-worker scratchpad for the Chudnovsky series.
//!
//! Holds the running factorial products, the 640320 power and the
//! alternating sign for the current term index k, all at working
//! precision, advanced in O(1) as k increments. Each worker owns exactly
//! one scratchpad; nothing here is shared.

use rug::ops::{NegAssign, Pow};
use rug::{Float, Integer};

/// 640320^3, the per-step growth of the `power_640320` register.
const STEP_640320_CUBED: u64 = 262_537_412_640_768_000;

/// Running per-term state for one worker.
///
/// Invariants, with k the current index:
/// - `fact_6k` = (6k)!, `fact_3k` = (3k)!, `fact_k_cubed` = (k!)^3
/// - `power_640320` = 640320^(3k)
/// - `power_neg1` = (-1)^k
#[derive(Debug)]
pub struct Scratchpad {
    prec: u32,
    k: u64,
    pub(crate) fact_6k: Float,
    pub(crate) fact_3k: Float,
    pub(crate) fact_k_cubed: Float,
    pub(crate) power_640320: Float,
    pub(crate) power_neg1: Float,
    /// Reusable register for the term calculator.
    pub(crate) tmp: Float,
}

impl Scratchpad {
    /// Fresh scratchpad at k = 0: factorials and power are 1, sign is +1.
    pub fn fresh(prec: u32) -> Self {
        Self::at(0, prec)
    }

    /// Scratchpad whose running state reflects an arbitrary starting index.
    ///
    /// Factorials are set from exact integer factorials and the 640320
    /// power uses binary exponentiation, so initialisation costs far less
    /// than the O(k0) of advancing a fresh scratchpad term by term. Every
    /// dynamic-mode chunk claim goes through this path.
    pub fn at(k0: u64, prec: u32) -> Self {
        let fact_k = factorial(k0);
        let sign = if k0 % 2 == 0 { 1 } else { -1 };
        Self {
            prec,
            k: k0,
            fact_6k: Float::with_val(prec, factorial(6 * k0)),
            fact_3k: Float::with_val(prec, factorial(3 * k0)),
            fact_k_cubed: Float::with_val(prec, Integer::from(Pow::pow(&fact_k, 3u32))),
            power_640320: Float::with_val(prec, 640_320u32).pow(exponent_3k(k0)),
            power_neg1: Float::with_val(prec, sign),
            tmp: Float::new(prec),
        }
    }

    /// Advance the running state from k to k+1.
    ///
    /// (6k)! gains the six factors 6k+1..6k+6, (3k)! the three factors
    /// 3k+1..3k+3, (k!)^3 the cubed step factor (k+1)^3; the 640320 power
    /// grows by 640320^3 and the sign flips.
    pub fn advance(&mut self) {
        let k = self.k;
        for i in 1..=6u64 {
            self.fact_6k *= 6 * k + i;
        }
        for i in 1..=3u64 {
            self.fact_3k *= 3 * k + i;
        }
        let step = k + 1;
        for _ in 0..3 {
            self.fact_k_cubed *= step;
        }
        self.power_640320 *= STEP_640320_CUBED;
        self.power_neg1.neg_assign();
        self.k = k + 1;
    }

    /// Series index the running state currently reflects.
    pub fn k(&self) -> u64 {
        self.k
    }

    /// Working precision of every register, in bits.
    pub fn prec(&self) -> u32 {
        self.prec
    }

    /// True while `power_neg1` is +1, i.e. while k is even.
    pub fn sign_is_positive(&self) -> bool {
        self.power_neg1.is_sign_positive()
    }

    /// (6k)! at working precision.
    pub fn fact_6k(&self) -> &Float {
        &self.fact_6k
    }

    /// (3k)! at working precision.
    pub fn fact_3k(&self) -> &Float {
        &self.fact_3k
    }

    /// (k!)^3 at working precision.
    pub fn fact_k_cubed(&self) -> &Float {
        &self.fact_k_cubed
    }

    /// 640320^(3k) at working precision.
    pub fn power_640320(&self) -> &Float {
        &self.power_640320
    }
}

/// Exact n! as an integer.
///
/// The precision planner caps supported digit counts so that 6*K stays
/// within `u32` range; a failing conversion means that invariant broke.
fn factorial(n: u64) -> Integer {
    let n = u32::try_from(n).expect("factorial index exceeds u32 range");
    Integer::from(Integer::factorial(n))
}

/// 3*k as the `u32` exponent for the 640320 power fast path.
fn exponent_3k(k: u64) -> u32 {
    u32::try_from(3 * k).expect("640320 exponent exceeds u32 range")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREC: u32 = 512;

    #[test]
    fn fresh_state_is_all_ones() {
        let scratch = Scratchpad::fresh(PREC);
        assert_eq!(scratch.k(), 0);
        assert_eq!(*scratch.fact_6k(), 1);
        assert_eq!(*scratch.fact_3k(), 1);
        assert_eq!(*scratch.fact_k_cubed(), 1);
        assert_eq!(*scratch.power_640320(), 1);
        assert!(scratch.sign_is_positive());
    }

    #[test]
    fn init_at_two_matches_closed_forms() {
        let scratch = Scratchpad::at(2, PREC);
        // (12)! = 479001600, (6)! = 720, (2!)^3 = 8
        assert_eq!(*scratch.fact_6k(), 479_001_600);
        assert_eq!(*scratch.fact_3k(), 720);
        assert_eq!(*scratch.fact_k_cubed(), 8);
        let power = Float::with_val(PREC, 640_320u32).pow(6u32);
        assert_eq!(*scratch.power_640320(), power);
        assert!(scratch.sign_is_positive());
    }

    #[test]
    fn sign_tracks_parity_of_k() {
        assert!(Scratchpad::at(0, PREC).sign_is_positive());
        assert!(!Scratchpad::at(1, PREC).sign_is_positive());
        assert!(Scratchpad::at(2, PREC).sign_is_positive());
        assert!(!Scratchpad::at(7, PREC).sign_is_positive());
    }

    #[test]
    fn advance_flips_sign_each_step() {
        let mut scratch = Scratchpad::fresh(PREC);
        for k in 0..8u64 {
            assert_eq!(scratch.sign_is_positive(), k % 2 == 0);
            scratch.advance();
        }
    }

    #[test]
    fn factorial_advance_law() {
        // After advancing from k to k+1, (6k+6)! must equal the previous
        // (6k)! times the six new factors. Values stay far below 512 bits,
        // so the comparison is exact.
        let mut scratch = Scratchpad::at(3, PREC);
        let before = scratch.fact_6k().clone();
        scratch.advance();
        let mut expected = before;
        for i in 1..=6u64 {
            expected *= 6 * 3 + i;
        }
        assert_eq!(*scratch.fact_6k(), expected);
    }

    #[test]
    fn advanced_fresh_matches_direct_init() {
        // Walking a fresh scratchpad to k0 must land on the same state the
        // fast initialiser produces.
        let k0 = 5u64;
        let mut walked = Scratchpad::fresh(PREC * 2);
        for _ in 0..k0 {
            walked.advance();
        }
        let direct = Scratchpad::at(k0, PREC * 2);
        assert_eq!(walked.k(), direct.k());
        assert_eq!(*walked.fact_6k(), *direct.fact_6k());
        assert_eq!(*walked.fact_3k(), *direct.fact_3k());
        assert_eq!(*walked.fact_k_cubed(), *direct.fact_k_cubed());
        assert_eq!(*walked.power_640320(), *direct.power_640320());
        assert_eq!(walked.sign_is_positive(), direct.sign_is_positive());
    }
}

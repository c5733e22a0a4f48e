//! Combining partial sums into pi and formatting the decimal string.

use rug::Float;

/// Number of guard places used when rounding before truncation.
const FORMAT_GUARD_DIGITS: usize = 5;

/// The Chudnovsky constant C = 426880 * sqrt(10005) at the given precision.
///
/// The square root rounds to nearest, ties to even, like every other
/// operation in the pipeline.
pub fn chudnovsky_constant(prec: u32) -> Float {
    let sqrt_10005 = Float::with_val(prec, 10_005u32).sqrt();
    sqrt_10005 * 426_880u32
}

/// Sum the partials in slice order, then pi = C / sum.
///
/// Accumulation order is ascending worker index, fixed so identical
/// (digits, threads, mode) runs produce bit-identical sums.
pub fn combine(partials: &[Float], prec: u32) -> Float {
    let mut total = Float::with_val(prec, 0);
    for partial in partials {
        total += partial;
    }
    chudnovsky_constant(prec) / total
}

/// Format pi as `"3."` followed by exactly `digits` fractional digits.
///
/// The value is rendered with [`FORMAT_GUARD_DIGITS`] extra places
/// (rounded to nearest) and then truncated, so the kept digits are plain
/// truncation of the computed value.
pub fn format_pi(pi: &Float, digits: u64) -> String {
    let digits = digits as usize;
    let rounded = format!("{:.*}", digits + FORMAT_GUARD_DIGITS, pi);
    rounded[..digits + 2].to_string()
}

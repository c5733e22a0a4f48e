//! Comparison of a computed pi string against a reference digits file.
//!
//! The reference file is ASCII `"3."` followed by decimal digits; trailing
//! CR/LF is tolerated and stripped before the effective digit count is
//! computed.

use std::fs;
use std::path::Path;

use crate::error::PiError;

/// Digits of context shown on either side of a mismatch.
const MISMATCH_CONTEXT: usize = 10;

/// Outcome of checking computed digits against the reference file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification {
    /// Every requested digit matches.
    Match,
    /// The strings diverge.
    Mismatch {
        /// First mismatching decimal place, counted from 1 after "3.".
        decimal_place: u64,
        /// Reference digits around the divergence.
        reference_context: String,
        /// Computed digits around the divergence.
        computed_context: String,
    },
    /// The reference file holds fewer digits than requested.
    Unknown {
        requested: u64,
        available: u64,
    },
}

/// Compare `computed` ("3." + digits) against the reference file.
///
/// # Errors
///
/// `Io` when the reference file cannot be read.
pub fn verify_pi(
    computed: &str,
    reference_path: &Path,
    decimal_places: u64,
) -> Result<Verification, PiError> {
    let raw = fs::read_to_string(reference_path)?;
    let reference = raw.trim_end_matches(['\r', '\n']);
    let available = reference.len().saturating_sub(2) as u64;
    if decimal_places > available {
        return Ok(Verification::Unknown {
            requested: decimal_places,
            available,
        });
    }

    let want = (decimal_places + 2) as usize;
    let reference = &reference[..want];
    let computed = &computed[..want.min(computed.len())];
    if computed == reference {
        Ok(Verification::Match)
    } else {
        Ok(first_divergence(reference, computed))
    }
}

/// Locate the first differing character and capture context around it.
fn first_divergence(reference: &str, computed: &str) -> Verification {
    let ref_bytes = reference.as_bytes();
    let comp_bytes = computed.as_bytes();
    let len = ref_bytes.len().min(comp_bytes.len());

    let position = (0..len)
        .find(|&i| ref_bytes[i] != comp_bytes[i])
        // Same prefix: the strings differ in length.
        .unwrap_or(len);

    let start = position.saturating_sub(MISMATCH_CONTEXT);
    let end = (position + MISMATCH_CONTEXT + 1).min(len);
    Verification::Mismatch {
        // Positions 0 and 1 are "3."; decimal places count from 1.
        decimal_place: (position as u64).saturating_sub(1),
        reference_context: reference[start..end].to_string(),
        computed_context: computed[start..end].to_string(),
    }
}

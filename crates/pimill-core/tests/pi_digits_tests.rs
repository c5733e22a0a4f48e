//! End-to-end digit correctness for the Chudnovsky pipeline and the
//! Gauss-Legendre fallback.
//!
//! Every scenario compares the emitted decimal string against a fixed
//! 200-place reference, so schedule changes that corrupt trailing digits
//! show up as plain string mismatches.

use pimill_core::{CancelHandle, JobConfig, ScheduleMode, compute_pi_decimal, finalize, gauss};

/// pi to 200 decimal places.
const PI_200: &str = "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899862803482534211706798214808651328230664709384460955058223172535940812848111745028410270193852110555964462294895493038196";

/// Clamp a requested worker count to the machine the tests run on.
fn capped(threads: usize) -> usize {
    threads.min(num_cpus::get()).max(1)
}

fn run(digits: u64, threads: usize, mode: ScheduleMode, chunk_size: u64) -> String {
    let config = JobConfig {
        threads: capped(threads),
        mode,
        chunk_size,
        ..JobConfig::for_digits(digits)
    };
    compute_pi_decimal(&config, &CancelHandle::new()).unwrap()
}

fn reference(digits: usize) -> &'static str {
    &PI_200[..digits + 2]
}

// ===========================================================================
// Static dispatch
// ===========================================================================

#[test]
fn ten_digits_single_thread_static() {
    assert_eq!(run(10, 1, ScheduleMode::Static, 16), reference(10));
}

#[test]
fn ten_digits_four_threads_static() {
    assert_eq!(run(10, 4, ScheduleMode::Static, 16), reference(10));
}

#[test]
fn one_hundred_digits_single_thread_static() {
    assert_eq!(run(100, 1, ScheduleMode::Static, 16), reference(100));
}

#[test]
fn two_hundred_digits_four_threads_static() {
    assert_eq!(run(200, 4, ScheduleMode::Static, 16), reference(200));
}

#[test]
fn single_digit_output() {
    assert_eq!(run(1, 1, ScheduleMode::Static, 16), "3.1");
}

// ===========================================================================
// Dynamic dispatch
// ===========================================================================

#[test]
fn ten_digits_dynamic_chunk_four() {
    assert_eq!(run(10, 4, ScheduleMode::Dynamic, 4), reference(10));
}

#[test]
fn fifty_digits_dynamic_chunk_two() {
    assert_eq!(run(50, 8, ScheduleMode::Dynamic, 2), reference(50));
}

#[test]
fn one_hundred_digits_dynamic_chunk_one() {
    // Chunk size one maximises schedule interleaving.
    assert_eq!(run(100, 4, ScheduleMode::Dynamic, 1), reference(100));
}

#[test]
fn dynamic_chunk_larger_than_series() {
    // A single oversized claim collapses to one worker doing everything.
    assert_eq!(run(10, 2, ScheduleMode::Dynamic, 1_000), reference(10));
}

// ===========================================================================
// Schedule agreement and reproducibility
// ===========================================================================

#[test]
fn serial_static_equals_serial_dynamic() {
    let via_static = run(120, 1, ScheduleMode::Static, 16);
    let via_dynamic = run(120, 1, ScheduleMode::Dynamic, 16);
    assert_eq!(via_static, via_dynamic);
}

#[test]
fn static_thread_counts_agree() {
    let serial = run(150, 1, ScheduleMode::Static, 16);
    for threads in [2, 3, 4, 8] {
        assert_eq!(run(150, threads, ScheduleMode::Static, 16), serial);
    }
}

#[test]
fn thousand_digits_schedules_agree() {
    let serial = run(1_000, 1, ScheduleMode::Static, 16);
    let dynamic = run(1_000, 4, ScheduleMode::Dynamic, 16);
    assert_eq!(serial, dynamic);
    assert_eq!(serial.len(), 1_002);
    // The known 200-place prefix must survive at the larger digit count.
    assert!(serial.starts_with(PI_200));
}

#[test]
fn idempotent_runs_are_byte_identical() {
    let first = run(150, 4, ScheduleMode::Static, 16);
    let second = run(150, 4, ScheduleMode::Static, 16);
    assert_eq!(first, second);
}

// ===========================================================================
// Gauss-Legendre fallback
// ===========================================================================

#[test]
fn gauss_ten_digits_match_reference() {
    let pi = gauss::calculate_pi(10, &CancelHandle::new()).unwrap();
    assert_eq!(finalize::format_pi(&pi, 10), reference(10));
}

#[test]
fn gauss_one_hundred_digits_match_reference() {
    let pi = gauss::calculate_pi(100, &CancelHandle::new()).unwrap();
    assert_eq!(finalize::format_pi(&pi, 100), reference(100));
}

#[test]
fn gauss_and_chudnovsky_agree() {
    let pi = gauss::calculate_pi(80, &CancelHandle::new()).unwrap();
    assert_eq!(
        finalize::format_pi(&pi, 80),
        run(80, 2, ScheduleMode::Static, 16)
    );
}

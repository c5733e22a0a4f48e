//! Work dispatch across worker threads.
//!
//! Two schemes: **static** hands each worker a contiguous k-range fixed at
//! launch; **dynamic** lets workers claim fixed-size chunks from a shared
//! atomic counter. Either way each worker owns its scratchpad, accumulates
//! its terms in ascending k order into a private partial sum, and hands
//! the partial back at join time. The only shared mutable state is the
//! dynamic counter, the stop flag and the progress counters.

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use rug::Float;

use crate::cancel::CancelHandle;
use crate::config::{JobConfig, ScheduleMode};
use crate::diag::{self, Diag};
use crate::error::PiError;
use crate::finalize;
use crate::precision;
use crate::scratch::Scratchpad;
use crate::term;

/// Dispatcher lifecycle, advanced by [`Dispatcher::run`].
///
/// `Aborted` is terminal and produces no pi.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Launched,
    Running,
    Finalizing,
    Done,
    Aborted,
}

/// What a worker hands back at join time. Workers never unwind across the
/// join; cancellation travels as a status.
enum WorkerStatus {
    Completed(Float),
    Cancelled,
}

/// Shared progress counters, read by the monitor thread only.
#[derive(Debug, Default)]
pub struct Progress {
    done: AtomicU64,
    total: AtomicU64,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
    }

    pub(crate) fn add_done(&self, terms: u64) {
        self.done.fetch_add(terms, Ordering::Relaxed);
    }

    /// (terms done, terms total). Both are relaxed snapshots.
    pub fn snapshot(&self) -> (u64, u64) {
        (
            self.done.load(Ordering::Relaxed),
            self.total.load(Ordering::Relaxed),
        )
    }
}

/// Contiguous block decomposition of `[0, total)` over `workers` ranges.
///
/// base = floor(total / workers) and the first `total mod workers` ranges take
/// one extra term. Ranges are ascending, disjoint and cover `[0, total)`
/// exactly; trailing ranges may be empty when workers outnumber terms.
pub fn partition(total: u64, workers: usize) -> Vec<Range<u64>> {
    let workers_u64 = workers as u64;
    let base = total / workers_u64;
    let remainder = total % workers_u64;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0u64;
    for t in 0..workers_u64 {
        let extra = u64::from(t < remainder);
        let end = start + base + extra;
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Owns one job: launches workers, joins them, combines their partials.
pub struct Dispatcher {
    config: JobConfig,
    progress: Arc<Progress>,
    diag: Arc<Diag>,
    phase: Phase,
}

impl Dispatcher {
    pub fn new(config: JobConfig, progress: Arc<Progress>, diag: Arc<Diag>) -> Self {
        Self {
            config,
            progress,
            diag,
            phase: Phase::Idle,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the job to completion: validate, launch, join, combine.
    ///
    /// Returns pi at working precision. On cancellation the partial sums
    /// are dropped unread and the phase ends at `Aborted`.
    pub fn run(&mut self, cancel: &CancelHandle) -> Result<Float, PiError> {
        self.config.validate()?;
        let prec = precision::precision_bits(self.config.digits, self.config.precision_buffer)?;
        let total_terms = precision::estimate_required_k(self.config.digits);
        self.progress.set_total(total_terms);
        self.diag.emit(
            diag::LEVEL_RANGES,
            format_args!(
                "working precision {prec} bits, {total_terms} terms, {} workers, {:?} dispatch",
                self.config.threads, self.config.mode
            ),
        );

        self.phase = Phase::Launched;
        let statuses = match self.config.mode {
            ScheduleMode::Static => self.run_static(prec, total_terms, cancel),
            ScheduleMode::Dynamic => self.run_dynamic(prec, total_terms, cancel),
        };

        if cancel.is_stop_requested() {
            self.phase = Phase::Aborted;
            return Err(PiError::Cancelled);
        }
        let mut partials = Vec::with_capacity(statuses.len());
        for status in statuses {
            match status {
                WorkerStatus::Completed(partial) => partials.push(partial),
                WorkerStatus::Cancelled => {
                    self.phase = Phase::Aborted;
                    return Err(PiError::Cancelled);
                }
            }
        }

        self.phase = Phase::Finalizing;
        for (worker, partial) in partials.iter().enumerate() {
            self.diag.emit(
                diag::LEVEL_PARTIALS,
                format_args!("[main] partial[{worker}] = {partial:.60e}"),
            );
        }
        let pi = finalize::combine(&partials, prec);
        self.phase = Phase::Done;
        Ok(pi)
    }

    fn run_static(
        &mut self,
        prec: u32,
        total_terms: u64,
        cancel: &CancelHandle,
    ) -> Vec<WorkerStatus> {
        let ranges = partition(total_terms, self.config.threads);
        for (worker, range) in ranges.iter().enumerate() {
            self.diag.emit(
                diag::LEVEL_RANGES,
                format_args!("[worker {worker}] k range {}..{}", range.start, range.end),
            );
        }

        let barrier = Barrier::new(self.config.threads + 1);
        let progress = Arc::clone(&self.progress);
        let sink = Arc::clone(&self.diag);
        thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .into_iter()
                .enumerate()
                .map(|(worker, range)| {
                    let progress = Arc::clone(&progress);
                    let sink = Arc::clone(&sink);
                    let barrier = &barrier;
                    scope.spawn(move || {
                        let scratch = Scratchpad::at(range.start, prec);
                        barrier.wait();
                        static_worker(worker, range, scratch, prec, cancel, &progress, &sink)
                    })
                })
                .collect();
            // All workers have initialised their scratchpads once the
            // barrier opens.
            barrier.wait();
            self.phase = Phase::Running;
            handles
                .into_iter()
                .map(|handle| handle.join().expect("worker thread panicked"))
                .collect()
        })
    }

    fn run_dynamic(
        &mut self,
        prec: u32,
        total_terms: u64,
        cancel: &CancelHandle,
    ) -> Vec<WorkerStatus> {
        let next_unassigned = AtomicU64::new(0);
        let chunk = self.config.chunk_size;
        let threads = self.config.threads;

        let barrier = Barrier::new(threads + 1);
        let progress = Arc::clone(&self.progress);
        let sink = Arc::clone(&self.diag);
        thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|worker| {
                    let progress = Arc::clone(&progress);
                    let sink = Arc::clone(&sink);
                    let barrier = &barrier;
                    let next_unassigned = &next_unassigned;
                    scope.spawn(move || {
                        barrier.wait();
                        dynamic_worker(
                            worker,
                            prec,
                            total_terms,
                            chunk,
                            next_unassigned,
                            cancel,
                            &progress,
                            &sink,
                        )
                    })
                })
                .collect();
            barrier.wait();
            self.phase = Phase::Running;
            handles
                .into_iter()
                .map(|handle| handle.join().expect("worker thread panicked"))
                .collect()
        })
    }
}

/// Sum every term in `range` into a private partial, ascending k.
///
/// The stop flag is polled between terms; a worker that observes it exits
/// without sealing its partial.
fn static_worker(
    worker: usize,
    range: Range<u64>,
    mut scratch: Scratchpad,
    prec: u32,
    cancel: &CancelHandle,
    progress: &Progress,
    sink: &Diag,
) -> WorkerStatus {
    let mut partial = Float::with_val(prec, 0);
    let mut term_value = Float::new(prec);
    for k in range {
        if cancel.is_stop_requested() {
            return WorkerStatus::Cancelled;
        }
        term::compute_term(&mut term_value, k, &mut scratch);
        sink.emit(
            diag::LEVEL_TERMS,
            format_args!("[worker {worker}] term {k} = {term_value:.40e}"),
        );
        partial += &term_value;
        scratch.advance();
        progress.add_done(1);
    }
    sink.emit(
        diag::LEVEL_PARTIALS,
        format_args!("[worker {worker}] partial sum = {partial:.60e}"),
    );
    WorkerStatus::Completed(partial)
}

/// Claim chunks off the shared counter until the series is exhausted.
///
/// The fetch-add uses `AcqRel` so chunk ownership is unambiguous between
/// claimants. The stop flag is polled before each claim. A worker whose
/// new claim abuts its previous chunk keeps advancing its scratchpad;
/// otherwise the scratchpad is fast-initialised at the chunk start.
#[allow(clippy::too_many_arguments)]
fn dynamic_worker(
    worker: usize,
    prec: u32,
    total_terms: u64,
    chunk: u64,
    next_unassigned: &AtomicU64,
    cancel: &CancelHandle,
    progress: &Progress,
    sink: &Diag,
) -> WorkerStatus {
    let mut partial = Float::with_val(prec, 0);
    let mut term_value = Float::new(prec);
    let mut scratch: Option<Scratchpad> = None;
    loop {
        if cancel.is_stop_requested() {
            return WorkerStatus::Cancelled;
        }
        let claim = next_unassigned.fetch_add(chunk, Ordering::AcqRel);
        if claim >= total_terms {
            break;
        }
        let end = (claim + chunk).min(total_terms);
        sink.emit(
            diag::LEVEL_PARTIALS,
            format_args!("[worker {worker}] claimed chunk {claim}..{end}"),
        );
        let pad = match scratch.take() {
            Some(pad) if pad.k() == claim => scratch.insert(pad),
            _ => scratch.insert(Scratchpad::at(claim, prec)),
        };
        for k in claim..end {
            term::compute_term(&mut term_value, k, pad);
            sink.emit(
                diag::LEVEL_TERMS,
                format_args!("[worker {worker}] term {k} = {term_value:.40e}"),
            );
            partial += &term_value;
            pad.advance();
        }
        progress.add_done(end - claim);
    }
    sink.emit(
        diag::LEVEL_PARTIALS,
        format_args!("[worker {worker}] partial sum = {partial:.60e}"),
    );
    WorkerStatus::Completed(partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_even_split() {
        let ranges = partition(8, 4);
        assert_eq!(ranges, vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn partition_remainder_goes_to_leading_workers() {
        let ranges = partition(10, 4);
        assert_eq!(ranges, vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn partition_more_workers_than_terms() {
        let ranges = partition(2, 4);
        assert_eq!(ranges, vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    fn partition_single_worker_takes_everything() {
        assert_eq!(partition(7, 1), vec![0..7]);
    }

    #[test]
    fn progress_snapshot_tracks_counters() {
        let progress = Progress::new();
        progress.set_total(100);
        progress.add_done(3);
        progress.add_done(4);
        assert_eq!(progress.snapshot(), (7, 100));
    }
}

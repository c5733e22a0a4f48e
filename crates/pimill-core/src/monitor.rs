//! Background system monitor: calculation progress and available memory.
//!
//! Purely observational; it reads the shared progress counters and the
//! kernel's meminfo, and never influences the computation.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::diag::{self, Diag};
use crate::dispatch::Progress;

/// Seconds between reports.
const REPORT_INTERVAL_SECS: u64 = 10;

/// Available system memory in KB from `/proc/meminfo`, if readable.
pub fn available_memory_kb() -> Option<u64> {
    let text = fs::read_to_string("/proc/meminfo").ok()?;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("MemAvailable:") {
            return rest.split_whitespace().next()?.parse().ok();
        }
    }
    None
}

/// Handle to the monitor thread.
pub struct SystemMonitor {
    keep_running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl SystemMonitor {
    /// Spawn the monitor thread; it reports every ~10 s until stopped.
    pub fn start(progress: Arc<Progress>, sink: Arc<Diag>) -> Self {
        let keep_running = Arc::new(AtomicBool::new(true));
        let keep = Arc::clone(&keep_running);
        let handle = thread::spawn(move || monitor_loop(&keep, &progress, &sink));
        Self {
            keep_running,
            handle,
        }
    }

    /// Stop the monitor and wait for its thread to exit.
    pub fn stop(self) {
        self.keep_running.store(false, Ordering::Release);
        let _ = self.handle.join();
    }
}

fn monitor_loop(keep_running: &AtomicBool, progress: &Progress, sink: &Diag) {
    while keep_running.load(Ordering::Acquire) {
        // Sleep in one-second slices so a stop request is observed
        // promptly.
        for _ in 0..REPORT_INTERVAL_SECS {
            if !keep_running.load(Ordering::Acquire) {
                return;
            }
            thread::sleep(Duration::from_secs(1));
        }

        let (done, total) = progress.snapshot();
        if total > 0 {
            let percent = done as f64 / total as f64 * 100.0;
            sink.emit(
                diag::LEVEL_PROGRESS,
                format_args!("progress: {done}/{total} terms ({percent:.1}%)"),
            );
        }
        if let Some(kb) = available_memory_kb() {
            sink.emit(
                diag::LEVEL_PROGRESS,
                format_args!("available memory: {} MB", kb / 1024),
            );
        }
    }
}

//! Progress reporting for extraction passes.
//!
//! The sampler reports after every decoded frame, kept or not, through a
//! [`ProgressCallback`]. Callbacks observe only; they cannot alter or stop
//! the run.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framesift::{ExtractOptions, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}/{} processed, {} saved", info.processed, info.total, info.saved);
//!     }
//! }
//!
//! let options = ExtractOptions::new().with_progress(Arc::new(PrintProgress));
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A snapshot of an extraction pass.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Frames decoded (or skipped past) so far.
    pub processed: u64,
    /// Frames written so far.
    pub saved: u64,
    /// Loop bound for this pass.
    pub total: u64,
    /// Completion percentage (0.0 - 100.0), `None` when `total` is zero.
    pub percentage: Option<f32>,
    /// Wall-clock time since the pass started.
    pub elapsed: Duration,
    /// Linear extrapolation of the remaining time. Advisory only.
    pub estimated_remaining: Option<Duration>,
    /// Source frame number of the most recently saved frame, if any.
    pub last_frame_number: Option<u64>,
}

/// Receives progress updates during extraction.
pub trait ProgressCallback: Send + Sync {
    /// Called after every frame the sampler advances past.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all notifications. The default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Remaining time estimate: `(elapsed / processed) * total - elapsed`.
///
/// `None` before the first frame; never negative.
pub fn estimate_remaining(elapsed: Duration, processed: u64, total: u64) -> Option<Duration> {
    if processed == 0 {
        return None;
    }
    let elapsed_seconds = elapsed.as_secs_f64();
    let estimated_total = elapsed_seconds / processed as f64 * total as f64;
    Some(Duration::from_secs_f64(
        (estimated_total - elapsed_seconds).max(0.0),
    ))
}

/// Per-run counters and timing. One tracker per pass; nothing is shared.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    processed: u64,
    saved: u64,
    last_frame_number: Option<u64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            processed: 0,
            saved: 0,
            last_frame_number: None,
            start_time: Instant::now(),
        }
    }

    /// Record a written frame. Reported with the next [`advance`](Self::advance).
    pub(crate) fn record_saved(&mut self, frame_number: u64) {
        self.saved += 1;
        self.last_frame_number = Some(frame_number);
    }

    /// Record `frames` processed frames and emit one report per frame.
    pub(crate) fn advance(&mut self, frames: u64) {
        for _ in 0..frames {
            self.processed += 1;
            self.report();
        }
    }

    pub(crate) fn saved(&self) -> u64 {
        self.saved
    }

    pub(crate) fn processed(&self) -> u64 {
        self.processed
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn report(&self) {
        let elapsed = self.start_time.elapsed();
        let percentage = (self.total > 0)
            .then(|| self.processed as f32 / self.total as f32 * 100.0);

        let info = ProgressInfo {
            processed: self.processed,
            saved: self.saved,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining: estimate_remaining(elapsed, self.processed, self.total),
            last_frame_number: self.last_frame_number,
        };

        self.callback.on_progress(&info);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;

    struct Recorder(Mutex<Vec<ProgressInfo>>);

    impl ProgressCallback for Recorder {
        fn on_progress(&self, info: &ProgressInfo) {
            self.0.lock().unwrap().push(info.clone());
        }
    }

    #[test]
    fn estimate_is_linear() {
        let remaining = estimate_remaining(Duration::from_secs(2), 10, 40).unwrap();
        assert!((remaining.as_secs_f64() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn estimate_needs_a_processed_frame() {
        assert!(estimate_remaining(Duration::from_secs(1), 0, 40).is_none());
    }

    #[test]
    fn estimate_never_negative() {
        let remaining = estimate_remaining(Duration::from_secs(5), 10, 5).unwrap();
        assert_eq!(remaining, Duration::ZERO);
    }

    #[test]
    fn tracker_reports_every_frame() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let mut tracker = ProgressTracker::new(recorder.clone(), 4);

        tracker.record_saved(0);
        tracker.advance(1);
        tracker.advance(2);
        tracker.record_saved(3);
        tracker.advance(1);

        let infos = recorder.0.lock().unwrap();
        let processed: Vec<u64> = infos.iter().map(|info| info.processed).collect();
        let saved: Vec<u64> = infos.iter().map(|info| info.saved).collect();
        assert_eq!(processed, vec![1, 2, 3, 4]);
        assert_eq!(saved, vec![1, 1, 1, 2]);
        assert_eq!(infos.last().unwrap().percentage, Some(100.0));
        assert_eq!(infos.last().unwrap().last_frame_number, Some(3));
        assert_eq!(tracker.processed(), 4);
        assert_eq!(tracker.saved(), 2);
    }

    #[test]
    fn zero_total_has_no_percentage() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let mut tracker = ProgressTracker::new(recorder.clone(), 0);
        tracker.advance(1);
        assert_eq!(recorder.0.lock().unwrap()[0].percentage, None);
    }
}

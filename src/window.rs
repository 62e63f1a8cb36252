//! Frame-index arithmetic for an extraction pass.
//!
//! An [`ExtractionWindow`] is the half-open range `[start_frame, end_frame)`
//! of source frames considered for sampling. The sampler scans it linearly
//! and keeps every `sample_rate`-th frame.

use std::time::Duration;

/// The half-open frame range considered for sampling.
///
/// Always satisfies `start_frame <= end_frame <= total_frames`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionWindow {
    /// First frame of the window (inclusive).
    pub start_frame: u64,
    /// End of the window (exclusive).
    pub end_frame: u64,
    /// Total frames in the source.
    pub total_frames: u64,
}

impl ExtractionWindow {
    /// Build a window from the frame the source landed on after seeking and
    /// an optional end time.
    ///
    /// `end_time` of `None` means "to the end of the stream". The end frame
    /// is clamped to `total_frames`, and the start frame to the end frame.
    pub fn new(
        start_frame: u64,
        end_time: Option<Duration>,
        frame_rate: u32,
        total_frames: u64,
    ) -> Self {
        let end_frame = match end_time {
            None => total_frames,
            Some(end_time) => {
                let end_frame = (end_time.as_secs_f64() * f64::from(frame_rate)) as u64;
                end_frame.min(total_frames)
            }
        };

        Self {
            start_frame: start_frame.min(end_frame),
            end_frame,
            total_frames,
        }
    }

    /// Number of frames in the window.
    pub fn len(&self) -> u64 {
        self.end_frame - self.start_frame
    }

    /// Returns `true` if the window contains no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Window length in seconds at `frame_rate`.
    pub fn duration_seconds(&self, frame_rate: u32) -> f64 {
        if frame_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / f64::from(frame_rate)
    }

    /// Upper bound on decode-loop iterations.
    ///
    /// With a frame cap `m`, the bound tightens to `min(len, m * sample_rate)`.
    /// A cap of zero means no cap.
    pub fn frames_to_process(&self, sample_rate: u64, max_frames: Option<u64>) -> u64 {
        match max_frames {
            Some(max_frames) if max_frames > 0 => {
                self.len().min(max_frames.saturating_mul(sample_rate))
            }
            _ => self.len(),
        }
    }
}

/// Source frame number for the frame at `position` within the window.
///
/// Computed as `floor((start_time + position / fps) * fps)`; the request's
/// start time is used rather than the seek's landing frame, so the number
/// reflects the requested timeline.
pub fn frame_number_at(start_time: Duration, position: u64, frame_rate: u32) -> u64 {
    let fps = f64::from(frame_rate);
    let frame_time = start_time.as_secs_f64() + position as f64 / fps;
    (frame_time * fps).floor() as u64
}

/// Whether the frame at `position` within the window is kept.
pub fn is_sampled(position: u64, sample_rate: u64) -> bool {
    position % sample_rate == 0
}

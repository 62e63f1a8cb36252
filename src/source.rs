//! The decoding capability the sampler is written against.
//!
//! [`VideoSource`] is the narrow interface between frame sampling and the
//! decoder. [`FfmpegSource`](crate::FfmpegSource) is the production
//! implementation; tests drive the sampler with synthetic sources.
//!
//! A source is released when it is dropped, so every exit path of an
//! extraction (normal completion, early break, propagated error) releases
//! the underlying handle.

use image::DynamicImage;

use crate::error::FramesiftError;

/// How the sampler moves past frames it is not going to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingStrategy {
    /// Decode and convert every frame in the window, keeping every Nth.
    ///
    /// Slowest, but behaves the same on every codec.
    #[default]
    SequentialScan,
    /// Ask the source to [`skip_frames`](VideoSource::skip_frames) between
    /// kept frames, letting it avoid work on frames that are discarded.
    SkipDecode,
}

/// A sequentially readable video stream.
pub trait VideoSource {
    /// Frames per second, truncated to an integer.
    fn frame_rate(&self) -> u32;

    /// Total number of frames in the stream.
    fn frame_count(&self) -> u64;

    /// Position the stream at `milliseconds` from its start.
    ///
    /// Returns the zero-based index of the frame the next
    /// [`read_next`](VideoSource::read_next) call will yield.
    fn seek(&mut self, milliseconds: u64) -> Result<u64, FramesiftError>;

    /// Decode the next frame, or `Ok(None)` at end of stream.
    fn read_next(&mut self) -> Result<Option<DynamicImage>, FramesiftError>;

    /// Advance past up to `count` frames without returning them.
    ///
    /// Returns how many frames were actually skipped; fewer than `count`
    /// means the stream ended. The default reads and discards.
    fn skip_frames(&mut self, count: u64) -> Result<u64, FramesiftError> {
        let mut skipped = 0;
        while skipped < count {
            if self.read_next()?.is_none() {
                break;
            }
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Total duration in seconds, derived from frame count and rate.
    fn duration_seconds(&self) -> f64 {
        match self.frame_rate() {
            0 => 0.0,
            fps => self.frame_count() as f64 / fps as f64,
        }
    }
}

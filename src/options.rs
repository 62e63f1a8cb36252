//! Run configuration for both passes.
//!
//! [`ExtractOptions`] and [`RenameOptions`] are builders; a
//! default-constructed value reproduces the stock behaviour (keep every
//! frame; rename at 25 fps with the `video1` token).
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framesift::{ExtractOptions, SamplingStrategy};
//!
//! let options = ExtractOptions::new()
//!     .with_sample_rate(15)
//!     .with_start_time(Duration::from_secs(30))
//!     .with_end_time(Some(Duration::from_secs(90)))
//!     .with_max_frames(Some(200))
//!     .with_strategy(SamplingStrategy::SkipDecode);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use crate::error::FramesiftError;
use crate::progress::{NoOpProgress, ProgressCallback};
use crate::source::SamplingStrategy;
use crate::writer::PngCompression;

/// Settings for an extraction pass.
#[derive(Clone)]
pub struct ExtractOptions {
    pub(crate) sample_rate: u64,
    pub(crate) start_time: Duration,
    pub(crate) end_time: Option<Duration>,
    pub(crate) max_frames: Option<u64>,
    pub(crate) strategy: SamplingStrategy,
    pub(crate) compression: PngCompression,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("sample_rate", &self.sample_rate)
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .field("max_frames", &self.max_frames)
            .field("strategy", &self.strategy)
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Every frame, whole stream, no cap, sequential scan, no progress.
    pub fn new() -> Self {
        Self {
            sample_rate: 1,
            start_time: Duration::ZERO,
            end_time: None,
            max_frames: None,
            strategy: SamplingStrategy::default(),
            compression: PngCompression::default(),
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Keep every `rate`-th frame. Zero is rejected when the pass starts.
    #[must_use]
    pub fn with_sample_rate(mut self, rate: u64) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Start decoding at this offset.
    #[must_use]
    pub fn with_start_time(mut self, start: Duration) -> Self {
        self.start_time = start;
        self
    }

    /// Stop at this offset. `None` runs to the end of the stream.
    #[must_use]
    pub fn with_end_time(mut self, end: Option<Duration>) -> Self {
        self.end_time = end;
        self
    }

    /// Cap the number of saved frames. `Some(0)` is treated as no cap.
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames.filter(|&max| max > 0);
        self
    }

    /// How to move past discarded frames.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// PNG compression effort.
    #[must_use]
    pub fn with_compression(mut self, compression: PngCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Sampling stride in frames.
    pub fn sample_rate(&self) -> u64 {
        self.sample_rate
    }

    /// Offset the pass seeks to before decoding.
    pub fn start_time(&self) -> Duration {
        self.start_time
    }

    /// Offset the window ends at, if any.
    pub fn end_time(&self) -> Option<Duration> {
        self.end_time
    }

    /// Saved-frame cap, never `Some(0)`.
    pub fn max_frames(&self) -> Option<u64> {
        self.max_frames
    }

    /// How discarded frames are passed over.
    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// An end time before the start time is not an error: the window
    /// clamps to empty, the same as a start past the end of the stream.
    pub(crate) fn validate(&self) -> Result<(), FramesiftError> {
        if self.sample_rate == 0 {
            return Err(FramesiftError::InvalidSampleRate);
        }
        Ok(())
    }
}

/// Token used by the renamer where the sampler writes `video{index}`.
pub const DEFAULT_VIDEO_TOKEN: &str = "video1";

/// Settings for a rename pass.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub(crate) sample_rate: u32,
    pub(crate) video_token: String,
    pub(crate) extension: String,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RenameOptions {
    /// 25 fps, `video1` token, `.png` inputs.
    pub fn new() -> Self {
        Self {
            sample_rate: 25,
            video_token: DEFAULT_VIDEO_TOKEN.to_string(),
            extension: crate::naming::FRAME_EXTENSION.to_string(),
        }
    }

    /// Capture rate used to turn frame times back into frame numbers.
    #[must_use]
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Token placed between the date and the video name.
    #[must_use]
    pub fn with_video_token(mut self, token: impl Into<String>) -> Self {
        self.video_token = token.into();
        self
    }

    /// Extension of the files to pick up, without the dot. Matching
    /// ignores case and the copies are written with the lowercase form.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension
            .into()
            .trim_start_matches('.')
            .to_ascii_lowercase();
        self
    }

    /// Capture rate in frames per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Token between the date and the video name.
    pub fn video_token(&self) -> &str {
        &self.video_token
    }

    /// Extension of the picked-up and written files.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub(crate) fn validate(&self) -> Result<(), FramesiftError> {
        if self.sample_rate == 0 {
            return Err(FramesiftError::InvalidSampleRate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn extract_defaults() {
        let options = ExtractOptions::new();
        assert_eq!(options.sample_rate(), 1);
        assert_eq!(options.start_time(), Duration::ZERO);
        assert_eq!(options.end_time(), None);
        assert_eq!(options.max_frames(), None);
        assert_eq!(options.strategy(), SamplingStrategy::SequentialScan);

        let debug = format!("{options:?}");
        assert!(debug.contains("ExtractOptions"));
        assert!(debug.contains("SequentialScan"));
    }

    #[test]
    fn zero_max_frames_means_uncapped() {
        let options = ExtractOptions::new().with_max_frames(Some(0));
        assert_eq!(options.max_frames(), None);
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let result = ExtractOptions::new().with_sample_rate(0).validate();
        assert!(matches!(result, Err(FramesiftError::InvalidSampleRate)));
    }

    #[test]
    fn end_before_start_is_accepted() {
        let result = ExtractOptions::new()
            .with_start_time(Duration::from_secs(10))
            .with_end_time(Some(Duration::from_secs(5)))
            .validate();
        assert!(result.is_ok());
    }

    #[test]
    fn rename_defaults() {
        let options = RenameOptions::new();
        assert_eq!(options.sample_rate(), 25);
        assert_eq!(options.video_token(), "video1");
        assert!(options.validate().is_ok());
        assert!(RenameOptions::new().with_sample_rate(0).validate().is_err());
    }

    #[test]
    fn rename_extension_drops_leading_dot() {
        let options = RenameOptions::new().with_extension(".PNG");
        assert_eq!(options.extension(), "png");
    }
}

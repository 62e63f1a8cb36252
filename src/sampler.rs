//! Frame sampling: decode a window of a video and save every Nth frame.
//!
//! [`extract_frames`] is the one-call entry point. [`FrameSampler`] is the
//! same pass over any [`VideoSource`] and [`ImageWriter`], returning an
//! [`ExtractionReport`] with the run's counters.
//!
//! # Example
//!
//! ```no_run
//! use framesift::{ExtractOptions, FramesiftError};
//!
//! let options = ExtractOptions::new().with_sample_rate(15);
//! let saved = framesift::extract_frames(
//!     "00000000205000400.mp4",
//!     "extracted_data",
//!     "01-08-24",
//!     1,
//!     &options,
//! )?;
//! println!("saved {} frames", saved.len());
//! # Ok::<(), FramesiftError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    decoder::FfmpegSource,
    error::FramesiftError,
    naming::{sampled_frame_name, video_stem},
    options::ExtractOptions,
    progress::ProgressTracker,
    source::{SamplingStrategy, VideoSource},
    window::{ExtractionWindow, frame_number_at, is_sampled},
    writer::{ImageWriter, PngWriter},
};

/// Tokens embedded verbatim in every sampled file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLabel {
    /// Recording date, e.g. `"01-08-24"`.
    pub video_date: String,
    /// Index of the video within that date.
    pub video_index: u32,
    /// Source file stem.
    pub video_name: String,
}

impl FrameLabel {
    /// Label frames from `video_path`, using its stem as the video name.
    pub fn for_video(video_path: &Path, video_date: &str, video_index: u32) -> Self {
        Self {
            video_date: video_date.to_string(),
            video_index,
            video_name: video_stem(video_path),
        }
    }

    fn file_name(&self, frame_number: u64, crop_count: u64) -> String {
        sampled_frame_name(
            &self.video_date,
            self.video_index,
            &self.video_name,
            frame_number,
            crop_count,
        )
    }
}

/// Outcome of one extraction pass.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExtractionReport {
    /// Saved files in increasing crop-count order.
    pub saved_frames: Vec<PathBuf>,
    /// Frames decoded or skipped past.
    pub frames_processed: u64,
    /// Loop bound after applying the frame cap.
    pub frames_to_process: u64,
    /// The frame window that was scanned.
    pub window: ExtractionWindow,
    /// Integer frame rate used for the arithmetic.
    pub frame_rate: u32,
    /// Wall-clock duration of the pass.
    pub elapsed: Duration,
    /// Set when a decode failure ended the pass early.
    pub decode_error: Option<String>,
}

impl ExtractionReport {
    /// Number of frames written.
    pub fn saved_count(&self) -> usize {
        self.saved_frames.len()
    }
}

/// One extraction pass over an owned source.
///
/// The source is consumed by [`run`](FrameSampler::run) and dropped when it
/// returns, whichever way it returns.
#[derive(Debug)]
pub struct FrameSampler<S, W = PngWriter> {
    source: S,
    writer: W,
    label: FrameLabel,
}

impl<S: VideoSource, W: ImageWriter> FrameSampler<S, W> {
    /// Pair a source with the writer its sampled frames go to, naming them
    /// after `label`.
    pub fn new(source: S, writer: W, label: FrameLabel) -> Self {
        Self {
            source,
            writer,
            label,
        }
    }

    /// Scan the window and write every `sample_rate`-th frame under
    /// `output_folder`, creating the folder if needed.
    ///
    /// The pass ends at end of stream, at the loop bound, or once
    /// `max_frames` frames are saved. A decode failure ends it early
    /// without an error; write failures are returned. An end time before
    /// the start time gives an empty window and saves nothing.
    ///
    /// # Errors
    ///
    /// - [`FramesiftError::InvalidSampleRate`] for a zero sample rate.
    /// - [`FramesiftError::InvalidFrameRate`] if the source reports 0 fps.
    /// - [`FramesiftError::Io`] / [`FramesiftError::Image`] if a frame
    ///   cannot be written. Frames already written stay on disk.
    pub fn run(
        mut self,
        output_folder: &Path,
        options: &ExtractOptions,
    ) -> Result<ExtractionReport, FramesiftError> {
        options.validate()?;

        let frame_rate = self.source.frame_rate();
        if frame_rate == 0 {
            return Err(FramesiftError::InvalidFrameRate(0.0));
        }

        fs::create_dir_all(output_folder)?;

        let total_frames = self.source.frame_count();
        let start_time = options.start_time;
        let start_frame = self.source.seek(start_time.as_millis() as u64)?;
        let window = ExtractionWindow::new(start_frame, options.end_time, frame_rate, total_frames);
        let sample_rate = options.sample_rate;

        log::info!("Video FPS: {frame_rate}");
        log::info!(
            "Total video duration: {:.2} seconds",
            self.source.duration_seconds()
        );
        match options.end_time {
            Some(end_time) if end_time < start_time => log::warn!(
                "End time {:.2}s is before start time {:.2}s; nothing to extract",
                end_time.as_secs_f64(),
                start_time.as_secs_f64()
            ),
            Some(end_time) => log::info!(
                "Processing from {:.2}s to {:.2}s",
                start_time.as_secs_f64(),
                end_time.as_secs_f64()
            ),
            None => log::info!("Processing from {:.2}s to end", start_time.as_secs_f64()),
        }
        log::info!(
            "Interval duration: {:.2} seconds",
            window.duration_seconds(frame_rate)
        );
        log::info!("Frames to process: {}", window.len());
        log::info!("Extracting every {sample_rate} frame(s)");
        log::info!("Saving frames to: {}", output_folder.display());
        log::info!(
            "Effective frame rate: {:.2} FPS",
            f64::from(frame_rate) / sample_rate as f64
        );

        let frames_to_process = window.frames_to_process(sample_rate, options.max_frames);
        let mut tracker = ProgressTracker::new(options.progress.clone(), frames_to_process);
        let mut saved_frames = Vec::new();
        let mut decode_error = None;
        let mut position = 0_u64;

        while position < frames_to_process {
            let frame = match self.source.read_next() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(error) => {
                    log::warn!("Decoding stopped at window position {position}: {error}");
                    decode_error = Some(error.to_string());
                    break;
                }
            };

            if is_sampled(position, sample_rate) {
                let frame_number = frame_number_at(start_time, position, frame_rate);
                let crop_count = tracker.saved() + 1;
                let path = output_folder.join(self.label.file_name(frame_number, crop_count));

                self.writer.write(&path, &frame)?;
                log::debug!("Saved frame {frame_number} -> {}", path.display());

                saved_frames.push(path);
                tracker.record_saved(frame_number);
            }

            position += 1;
            tracker.advance(1);

            if options.max_frames.is_some_and(|max| tracker.saved() >= max) {
                break;
            }

            if options.strategy == SamplingStrategy::SkipDecode && sample_rate > 1 {
                let wanted = (sample_rate - 1).min(frames_to_process - position);
                let skipped = match self.source.skip_frames(wanted) {
                    Ok(skipped) => skipped,
                    Err(error) => {
                        log::warn!("Decoding stopped at window position {position}: {error}");
                        decode_error = Some(error.to_string());
                        break;
                    }
                };
                position += skipped;
                tracker.advance(skipped);
                if skipped < wanted {
                    break;
                }
            }
        }

        let elapsed = tracker.elapsed();
        log::info!(
            "Extracted {} frames to {}",
            saved_frames.len(),
            output_folder.display()
        );
        log::info!("Total time: {:.2} seconds", elapsed.as_secs_f64());

        Ok(ExtractionReport {
            saved_frames,
            frames_processed: tracker.processed(),
            frames_to_process,
            window,
            frame_rate,
            elapsed,
            decode_error,
        })
    }
}

/// Open `video_path` with FFmpeg and run a full extraction pass into
/// `output_folder`, writing lossless PNGs.
///
/// Returns the saved paths in order.
///
/// # Errors
///
/// [`FramesiftError::VideoOpen`] if the video cannot be opened (nothing is
/// written), plus everything [`FrameSampler::run`] returns.
pub fn extract_frames<P: AsRef<Path>, Q: AsRef<Path>>(
    video_path: P,
    output_folder: Q,
    video_date: &str,
    video_index: u32,
    options: &ExtractOptions,
) -> Result<Vec<PathBuf>, FramesiftError> {
    extract_frames_with_report(video_path, output_folder, video_date, video_index, options)
        .map(|report| report.saved_frames)
}

/// Like [`extract_frames`], returning the full [`ExtractionReport`].
pub fn extract_frames_with_report<P: AsRef<Path>, Q: AsRef<Path>>(
    video_path: P,
    output_folder: Q,
    video_date: &str,
    video_index: u32,
    options: &ExtractOptions,
) -> Result<ExtractionReport, FramesiftError> {
    let video_path = video_path.as_ref();
    options.validate()?;

    let source = FfmpegSource::open(video_path)?;
    let label = FrameLabel::for_video(video_path, video_date, video_index);
    let writer = PngWriter::new(options.compression);

    FrameSampler::new(source, writer, label).run(output_folder.as_ref(), options)
}

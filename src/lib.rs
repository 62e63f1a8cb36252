//! # framesift
//!
//! Turn video footage into image datasets: sample still frames from a video
//! into deterministically named PNG files, and migrate older frame dumps
//! (named by frame time) to the same frame-number naming scheme.
//!
//! Decoding is done by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate and frames
//! are written losslessly with [`image`].
//!
//! ## Quick Start
//!
//! ### Sample frames
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framesift::ExtractOptions;
//!
//! // Every 15th frame between 0:10 and 0:40, at most 50 frames.
//! let options = ExtractOptions::new()
//!     .with_sample_rate(15)
//!     .with_start_time(Duration::from_secs(10))
//!     .with_end_time(Some(Duration::from_secs(40)))
//!     .with_max_frames(Some(50));
//!
//! let saved = framesift::extract_frames("clip.mp4", "frames", "01-08-24", 1, &options).unwrap();
//! // At 25 fps the first file is frames/01-08-24_video1_clip_250_1.png.
//! ```
//!
//! ### Rename a legacy dump
//!
//! ```no_run
//! use framesift::RenameOptions;
//!
//! // frames_old/clip_12.5.png -> frames_new/01-08-24_video1_clip_312.png
//! let count = framesift::rename_and_copy_frames(
//!     "frames_old",
//!     "frames_new",
//!     "clip",
//!     "01-08-24",
//!     &RenameOptions::new().with_sample_rate(25),
//! )
//! .unwrap();
//! ```
//!
//! ### Custom sources
//!
//! [`FrameSampler`] runs against any [`VideoSource`] and [`ImageWriter`],
//! which is how the sampling arithmetic is tested without video fixtures.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the build machine.

pub mod decoder;
pub mod error;
pub mod ffmpeg;
pub mod naming;
pub mod options;
pub mod progress;
pub mod renamer;
pub mod sampler;
pub mod source;
pub mod window;
pub mod writer;

pub use decoder::{FfmpegSource, VideoInfo};
pub use error::FramesiftError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use options::{DEFAULT_VIDEO_TOKEN, ExtractOptions, RenameOptions};
pub use progress::{ProgressCallback, ProgressInfo};
pub use renamer::{RenameReport, rename_and_copy_frames, rename_and_copy_frames_with_report};
pub use sampler::{
    ExtractionReport, FrameLabel, FrameSampler, extract_frames, extract_frames_with_report,
};
pub use source::{SamplingStrategy, VideoSource};
pub use window::ExtractionWindow;
pub use writer::{ImageWriter, PngCompression, PngWriter};

//! Error types for the `framesift` crate.
//!
//! [`FramesiftError`] is returned by every fallible operation. Variants carry
//! the offending path, token or value so a failed run can be diagnosed from
//! the message alone.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framesift` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramesiftError {
    /// The video could not be opened by the decoder.
    #[error("Failed to open video at {path}: {reason}")]
    VideoOpen {
        /// Path that was passed to [`FfmpegSource::open`](crate::FfmpegSource::open).
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container has no video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The source reported a frame rate that truncates to zero frames per second.
    #[error("Video reports an unusable frame rate of {0} fps")]
    InvalidFrameRate(f64),

    /// A sample rate of zero was provided.
    #[error("Sample rate must be greater than zero")]
    InvalidSampleRate,

    /// A legacy frame file name does not end in a decimal frame time.
    #[error("Could not parse frame time {token:?} from file name {file_name}")]
    FrameTimeParse {
        /// The file name that failed to parse.
        file_name: String,
        /// The trailing token that was expected to be a number.
        token: String,
    },

    /// A legacy frame file name ends in a negative or non-finite frame time.
    #[error(
        "Frame time {token:?} in file name {file_name} is out of range \
         (expected a finite, non-negative number of seconds)"
    )]
    FrameTimeOutOfRange {
        /// The file name carrying the time.
        file_name: String,
        /// The trailing token that parsed to an unusable number.
        token: String,
    },

    /// The renamer input folder does not exist.
    #[error("Input folder does not exist: {0}")]
    InputFolderMissing(PathBuf),

    /// A single video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecode(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading, writing or copying files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// The `image` crate failed to encode a frame.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

impl From<FfmpegError> for FramesiftError {
    fn from(error: FfmpegError) -> Self {
        FramesiftError::Ffmpeg(error.to_string())
    }
}

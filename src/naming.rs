//! Output filename schemes.
//!
//! Both schemes are a persisted contract: downstream tooling parses the
//! numbers back out of the names.
//!
//! - Sampled frames: `{date}_video{index}_{video_name}_{frame_number}_{crop_count}.png`
//! - Renamed legacy frames: `{date}_{video_token}_{video_name}_{frame_number}.{ext}`,
//!   keeping the extension the legacy files were picked up by (`png` by default)
//!
//! Legacy frame files carry a frame *time* in seconds as the last
//! underscore-delimited token of their stem, e.g. `clip_12.5.png`.

use std::path::Path;

use crate::error::FramesiftError;

/// Extension written for every output image.
pub const FRAME_EXTENSION: &str = "png";

/// File name for a frame saved by the sampler.
pub fn sampled_frame_name(
    video_date: &str,
    video_index: u32,
    video_name: &str,
    frame_number: u64,
    crop_count: u64,
) -> String {
    format!("{video_date}_video{video_index}_{video_name}_{frame_number}_{crop_count}.{FRAME_EXTENSION}")
}

/// File name for a renamed legacy frame with the given `extension`.
pub fn renamed_frame_name(
    video_date: &str,
    video_token: &str,
    video_name: &str,
    frame_number: u64,
    extension: &str,
) -> String {
    format!("{video_date}_{video_token}_{video_name}_{frame_number}.{extension}")
}

/// Base name of a video path without its extension.
pub fn video_stem(video_path: &Path) -> String {
    video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse the frame time (seconds) encoded in a legacy frame file name.
///
/// The time is the text after the last `_` of the file stem. A token that
/// is not a number is a [`FramesiftError::FrameTimeParse`]; a negative or
/// non-finite number is a [`FramesiftError::FrameTimeOutOfRange`].
pub fn parse_frame_time(file_name: &str) -> Result<f64, FramesiftError> {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let token = stem.rsplit('_').next().unwrap_or_default();

    let seconds = token
        .trim()
        .parse::<f64>()
        .map_err(|_| FramesiftError::FrameTimeParse {
            file_name: file_name.to_string(),
            token: token.to_string(),
        })?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(FramesiftError::FrameTimeOutOfRange {
            file_name: file_name.to_string(),
            token: token.to_string(),
        });
    }
    Ok(seconds)
}

/// Integer frame number for a frame time at `sample_rate` frames per second.
pub fn frame_number_from_time(frame_time: f64, sample_rate: u32) -> u64 {
    (frame_time * f64::from(sample_rate)).floor() as u64
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

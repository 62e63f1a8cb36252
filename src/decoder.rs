//! FFmpeg-backed [`VideoSource`].
//!
//! [`FfmpegSource`] owns the demuxer, a video decoder for the best video
//! stream and a scaler converting decoded pictures to packed RGB24. Frames
//! are pulled one packet at a time, so memory use stays at one decoded
//! picture regardless of clip length.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{error::FramesiftError, source::VideoSource};

/// Static facts about an opened video stream.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoInfo {
    /// Path the video was opened from.
    pub path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Exact (possibly fractional) frame rate reported by the container.
    pub frames_per_second: f64,
    /// Total frame count, from the stream header or estimated from duration.
    pub frame_count: u64,
    /// Container duration.
    pub duration: Duration,
    /// Decoder name, e.g. `"h264"`.
    pub codec: String,
}

/// A video file opened for sequential decoding.
///
/// Dropping the source releases the demuxer and decoder.
pub struct FfmpegSource {
    input: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    stream_index: usize,
    time_base: Rational,
    info: VideoInfo,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    /// `decoded_frame` holds a frame that has not been handed out yet.
    pending: bool,
    eof_sent: bool,
    /// Nothing has been read or sought yet.
    at_start: bool,
}

impl Debug for FfmpegSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FfmpegSource")
            .field("info", &self.info)
            .field("stream_index", &self.stream_index)
            .field("eof_sent", &self.eof_sent)
            .finish_non_exhaustive()
    }
}

impl FfmpegSource {
    /// Open a video file and prepare a decoder for its best video stream.
    ///
    /// # Errors
    ///
    /// - [`FramesiftError::VideoOpen`] if FFmpeg cannot open or probe the file.
    /// - [`FramesiftError::NoVideoStream`] if the container has no video.
    /// - [`FramesiftError::InvalidFrameRate`] if the frame rate is below 1 fps.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramesiftError> {
        let path = path.as_ref();
        let open_error = |reason: String| FramesiftError::VideoOpen {
            path: path.to_path_buf(),
            reason,
        };

        log::debug!("Opening video: {}", path.display());

        crate::ffmpeg::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let (stream_index, time_base, frames_per_second, header_frames, decoder) = {
            let stream = input
                .streams()
                .best(Type::Video)
                .ok_or(FramesiftError::NoVideoStream)?;

            let frames_per_second = rational_to_f64(stream.avg_frame_rate())
                .or_else(|| rational_to_f64(stream.rate()))
                .unwrap_or(0.0);

            let decoder_context = CodecContext::from_parameters(stream.parameters())
                .map_err(|error| open_error(format!("Failed to read codec parameters: {error}")))?;
            let decoder = decoder_context
                .decoder()
                .video()
                .map_err(|error| open_error(format!("Failed to create video decoder: {error}")))?;

            (
                stream.index(),
                stream.time_base(),
                frames_per_second,
                stream.frames(),
                decoder,
            )
        };

        if frames_per_second < 1.0 {
            return Err(FramesiftError::InvalidFrameRate(frames_per_second));
        }

        let frame_count = if header_frames > 0 {
            header_frames as u64
        } else {
            (duration.as_secs_f64() * frames_per_second) as u64
        };

        let width = decoder.width();
        let height = decoder.height();
        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| open_error(format!("Failed to create pixel converter: {error}")))?;

        let info = VideoInfo {
            path: path.to_path_buf(),
            width,
            height,
            frames_per_second,
            frame_count,
            duration,
            codec,
        };

        log::debug!(
            "Opened video stream {}: {}x{}, {:.3} fps, {} frames, codec={}",
            stream_index,
            info.width,
            info.height,
            info.frames_per_second,
            info.frame_count,
            info.codec,
        );

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            time_base,
            info,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            pending: false,
            eof_sent: false,
            at_start: true,
        })
    }

    /// Static facts about the stream.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Pull the next decoded picture into `decoded_frame`.
    ///
    /// Returns `false` once the decoder is fully drained.
    fn decode_next(&mut self) -> Result<bool, FramesiftError> {
        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return Ok(true);
            }

            if self.eof_sent {
                return Ok(false);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() == self.stream_index {
                        self.decoder
                            .send_packet(&packet)
                            .map_err(|error| FramesiftError::VideoDecode(error.to_string()))?;
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(error) => return Err(FramesiftError::VideoDecode(error.to_string())),
            }
        }
    }

    /// Make the next frame current, honouring a frame left over from a seek.
    fn advance(&mut self) -> Result<bool, FramesiftError> {
        self.at_start = false;
        if self.pending {
            self.pending = false;
            return Ok(true);
        }
        self.decode_next()
    }

    fn current_frame_number(&self) -> u64 {
        let timestamp = self
            .decoded_frame
            .timestamp()
            .or_else(|| self.decoded_frame.pts())
            .unwrap_or(0);
        let seconds = timestamp as f64 * f64::from(self.time_base);
        (seconds.max(0.0) * self.info.frames_per_second) as u64
    }

    fn convert_current(&mut self) -> Result<DynamicImage, FramesiftError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;

        let width = self.info.width;
        let height = self.info.height;
        let buffer = packed_rgb(&self.rgb_frame, width, height);
        let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            FramesiftError::VideoDecode(
                "Decoded frame does not match the stream dimensions".to_string(),
            )
        })?;
        Ok(DynamicImage::ImageRgb8(image))
    }
}

impl VideoSource for FfmpegSource {
    fn frame_rate(&self) -> u32 {
        self.info.frames_per_second as u32
    }

    fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    /// Seeks to the keyframe at or before the target, then decodes forward
    /// until the first frame at or after it.
    fn seek(&mut self, milliseconds: u64) -> Result<u64, FramesiftError> {
        let target_frame =
            (milliseconds as f64 / 1000.0 * self.info.frames_per_second) as u64;

        if milliseconds == 0 && self.at_start {
            return Ok(0);
        }

        // Container-level seek takes AV_TIME_BASE (microsecond) units.
        let timestamp = (milliseconds as i64).saturating_mul(1000);
        self.input.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.pending = false;
        self.eof_sent = false;
        self.at_start = false;

        while self.decode_next()? {
            if self.current_frame_number() >= target_frame {
                self.pending = true;
                break;
            }
        }

        log::debug!("Seeked to {milliseconds} ms (frame {target_frame})");
        Ok(target_frame)
    }

    fn read_next(&mut self) -> Result<Option<DynamicImage>, FramesiftError> {
        if !self.advance()? {
            return Ok(None);
        }
        self.convert_current().map(Some)
    }

    /// Decodes skipped frames but never runs the pixel converter on them.
    fn skip_frames(&mut self, count: u64) -> Result<u64, FramesiftError> {
        let mut skipped = 0;
        while skipped < count && self.advance()? {
            skipped += 1;
        }
        Ok(skipped)
    }
}

fn rational_to_f64(rate: Rational) -> Option<f64> {
    if rate.denominator() == 0 || rate.numerator() <= 0 {
        None
    } else {
        Some(f64::from(rate.numerator()) / f64::from(rate.denominator()))
    }
}

/// Copy an RGB24 frame into a tightly packed buffer, dropping row padding.
fn packed_rgb(frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let row_bytes = width as usize * 3;
    let data = frame.data(0);

    if stride == row_bytes {
        return data[..row_bytes * height as usize].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        buffer.extend_from_slice(&data[start..start + row_bytes]);
    }
    buffer
}

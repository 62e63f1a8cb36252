//! Persisting sampled frames.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{
    DynamicImage,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::error::FramesiftError;

/// zlib effort used when writing PNG frames. PNG is lossless at every level;
/// this trades file size against write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    /// Fastest encode, largest files. The default.
    #[default]
    Fast,
    /// Balanced.
    Default,
    /// Smallest files, slowest encode.
    Best,
}

impl PngCompression {
    fn compression_type(self) -> CompressionType {
        match self {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// Destination for decoded frames.
pub trait ImageWriter {
    /// Write `image` to `path` losslessly.
    fn write(&mut self, path: &Path, image: &DynamicImage) -> Result<(), FramesiftError>;
}

/// Writes frames as PNG files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngWriter {
    compression: PngCompression,
}

impl PngWriter {
    /// Create a writer with the given compression effort.
    pub fn new(compression: PngCompression) -> Self {
        Self { compression }
    }
}

impl ImageWriter for PngWriter {
    fn write(&mut self, path: &Path, image: &DynamicImage) -> Result<(), FramesiftError> {
        let mut file = BufWriter::new(File::create(path)?);
        let encoder = PngEncoder::new_with_quality(
            &mut file,
            self.compression.compression_type(),
            FilterType::Adaptive,
        );
        image.write_with_encoder(encoder)?;
        file.flush()?;
        Ok(())
    }
}

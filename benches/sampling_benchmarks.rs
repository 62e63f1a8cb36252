//! Benchmarks for frame sampling and PNG output.
//!
//! Run with: cargo bench
//!
//! The FFmpeg benchmarks require fixture files from
//! `tests/fixtures/generate_fixtures.sh`.

use std::{hint::black_box, path::Path};

use criterion::Criterion;
use framesift::{
    ExtractOptions, FfmpegLogLevel, FrameLabel, FrameSampler, FramesiftError, ImageWriter,
    PngCompression, PngWriter, SamplingStrategy, VideoSource,
};
use image::{DynamicImage, Rgb, RgbImage};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

/// Serves the same 320x240 picture for every frame.
struct StillSource {
    frame: DynamicImage,
    frames: u64,
    next: u64,
}

impl StillSource {
    fn new(frames: u64) -> Self {
        Self {
            frame: DynamicImage::ImageRgb8(RgbImage::from_pixel(320, 240, Rgb([40, 90, 160]))),
            frames,
            next: 0,
        }
    }
}

impl VideoSource for StillSource {
    fn frame_rate(&self) -> u32 {
        25
    }

    fn frame_count(&self) -> u64 {
        self.frames
    }

    fn seek(&mut self, milliseconds: u64) -> Result<u64, FramesiftError> {
        self.next = (milliseconds * 25 / 1000).min(self.frames);
        Ok(self.next)
    }

    fn read_next(&mut self) -> Result<Option<DynamicImage>, FramesiftError> {
        if self.next >= self.frames {
            return Ok(None);
        }
        self.next += 1;
        Ok(Some(self.frame.clone()))
    }
}

struct DiscardWriter;

impl ImageWriter for DiscardWriter {
    fn write(&mut self, _path: &Path, image: &DynamicImage) -> Result<(), FramesiftError> {
        black_box(image.width());
        Ok(())
    }
}

fn label() -> FrameLabel {
    FrameLabel {
        video_date: "01-08-24".to_string(),
        video_index: 1,
        video_name: "bench".to_string(),
    }
}

fn benchmark_sampling_loop(criterion: &mut Criterion) {
    let directory = tempfile::tempdir().unwrap();

    for strategy in [SamplingStrategy::SequentialScan, SamplingStrategy::SkipDecode] {
        let options = ExtractOptions::new()
            .with_sample_rate(10)
            .with_strategy(strategy);
        criterion.bench_function(&format!("sample 1000 frames every 10th ({strategy:?})"), |bencher| {
            bencher.iter(|| {
                FrameSampler::new(StillSource::new(1000), DiscardWriter, label())
                    .run(directory.path(), &options)
                    .unwrap()
            });
        });
    }
}

fn benchmark_png_writer(criterion: &mut Criterion) {
    let directory = tempfile::tempdir().unwrap();
    let frame = DynamicImage::ImageRgb8(RgbImage::from_fn(640, 480, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }));
    let path = directory.path().join("frame.png");

    for compression in [PngCompression::Fast, PngCompression::Default, PngCompression::Best] {
        let mut writer = PngWriter::new(compression);
        criterion.bench_function(&format!("write 640x480 png ({compression:?})"), |bencher| {
            bencher.iter(|| writer.write(&path, &frame).unwrap());
        });
    }
}

fn benchmark_video_extraction(criterion: &mut Criterion) {
    framesift::set_ffmpeg_log_level(FfmpegLogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }
    let directory = tempfile::tempdir().unwrap();

    for strategy in [SamplingStrategy::SequentialScan, SamplingStrategy::SkipDecode] {
        let options = ExtractOptions::new()
            .with_sample_rate(10)
            .with_strategy(strategy);
        criterion.bench_function(&format!("extract every 10th frame ({strategy:?})"), |bencher| {
            bencher.iter(|| {
                framesift::extract_frames(SAMPLE_VIDEO, directory.path(), "01-08-24", 1, &options)
                    .unwrap()
            });
        });
    }
}

criterion::criterion_group!(
    benches,
    benchmark_sampling_loop,
    benchmark_png_writer,
    benchmark_video_extraction,
);
criterion::criterion_main!(benches);

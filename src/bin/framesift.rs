use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use framesift::{
    ExtractOptions, FfmpegLogLevel, FfmpegSource, PngCompression, ProgressCallback, ProgressInfo,
    RenameOptions, SamplingStrategy,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framesift extract clip.mp4 --out frames --date 01-08-24 --index 1 --every 15 --progress\n  framesift extract clip.mp4 --out frames --date 01-08-24 --start 0:30 --end 1:30 --max-frames 200\n  framesift rename frames_old --out frames_new --video-name clip --date 01-08-24 --rate 25\n  framesift probe clip.mp4 --json\n  framesift completions zsh > _framesift";

#[derive(Debug, Parser)]
#[command(
    name = "framesift",
    version,
    about = "Sample video frames into named PNG datasets and rename legacy frame dumps",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Log per-frame and per-file detail.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while extracting.
    #[arg(long, global = true)]
    progress: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompressionArg {
    Fast,
    Default,
    Best,
}

impl From<CompressionArg> for PngCompression {
    fn from(value: CompressionArg) -> Self {
        match value {
            CompressionArg::Fast => PngCompression::Fast,
            CompressionArg::Default => PngCompression::Default,
            CompressionArg::Best => PngCompression::Best,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample frames from a video into PNG files.
    #[command(
        about = "Extract sampled frames",
        after_help = "Files are named {date}_video{index}_{video_name}_{frame_number}_{crop_count}.png"
    )]
    Extract {
        /// Input video path.
        input: PathBuf,
        /// Output directory (created if missing).
        #[arg(long)]
        out: PathBuf,
        /// Recording date token, e.g. 01-08-24.
        #[arg(long)]
        date: String,
        /// Video index within the date.
        #[arg(long, default_value_t = 1)]
        index: u32,
        /// Keep every Nth frame.
        #[arg(long, default_value_t = 1)]
        every: u64,
        /// Start time: seconds or [HH:]MM:SS(.fff).
        #[arg(long)]
        start: Option<String>,
        /// End time: seconds or [HH:]MM:SS(.fff). Defaults to end of video.
        #[arg(long)]
        end: Option<String>,
        /// Stop after saving this many frames.
        #[arg(long)]
        max_frames: Option<u64>,
        /// Skip pixel conversion for frames that are not kept.
        #[arg(long)]
        skip_decode: bool,
        /// PNG compression effort (always lossless).
        #[arg(long, value_enum, default_value_t = CompressionArg::Fast)]
        compression: CompressionArg,
        /// Print a JSON summary instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Copy legacy frame files (named by frame time) to frame-number names.
    #[command(
        about = "Rename legacy frame dumps",
        after_help = "Files are named {date}_{video_token}_{video_name}_{frame_number}.{ext}"
    )]
    Rename {
        /// Folder holding the legacy frame files.
        input: PathBuf,
        /// Output directory (created if missing).
        #[arg(long)]
        out: PathBuf,
        /// Video name placed in the new file names.
        #[arg(long)]
        video_name: String,
        /// Recording date token, e.g. 01-08-24.
        #[arg(long)]
        date: String,
        /// Capture rate in frames per second.
        #[arg(long, default_value_t = 25)]
        rate: u32,
        /// Token between the date and the video name.
        #[arg(long, default_value = framesift::DEFAULT_VIDEO_TOKEN)]
        video_token: String,
        /// Extension of the files to pick up; copies keep it.
        #[arg(long, default_value = "png")]
        ext: String,
        /// Print a JSON summary instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print frame rate, frame count and duration of a video.
    #[command(about = "Print video stream information", visible_alias = "info")]
    Probe {
        /// Input video path.
        input: PathBuf,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_timecode(value: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("time value cannot be empty".into());
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(format!("invalid time: {trimmed}").into());
        }
        return Ok(Duration::from_secs_f64(seconds));
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [minutes, seconds] => (0_u64, minutes.parse::<u64>()?, seconds.parse::<f64>()?),
        [hours, minutes, seconds] => (
            hours.parse::<u64>()?,
            minutes.parse::<u64>()?,
            seconds.parse::<f64>()?,
        ),
        _ => return Err(format!("invalid time format: {trimmed}").into()),
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("invalid time: {trimmed}").into());
    }

    let total = (hours * 3600 + minutes * 60) as f64 + seconds;
    Ok(Duration::from_secs_f64(total))
}

fn init_logging(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    if let Some(level) = &global.log_level {
        let level: FfmpegLogLevel = level.parse()?;
        framesift::set_ffmpeg_log_level(level);
    }

    Ok(())
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} frames {msg}",
        )?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total);
        self.bar.set_position(info.processed);

        let remaining = info
            .estimated_remaining
            .map(|remaining| format!("{:.2}s", remaining.as_secs_f64()))
            .unwrap_or_else(|| "-".to_string());
        self.bar.set_message(format!(
            "saved {} | elapsed {:.2}s | remaining {remaining}",
            info.saved,
            info.elapsed.as_secs_f64(),
        ));
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global)?;

    match cli.command {
        Commands::Extract {
            input,
            out,
            date,
            index,
            every,
            start,
            end,
            max_frames,
            skip_decode,
            compression,
            json,
        } => {
            if every == 0 {
                return Err("--every must be greater than 0".into());
            }

            let start_time = start
                .as_deref()
                .map(parse_timecode)
                .transpose()?
                .unwrap_or(Duration::ZERO);
            let end_time = end.as_deref().map(parse_timecode).transpose()?;

            let strategy = if skip_decode {
                SamplingStrategy::SkipDecode
            } else {
                SamplingStrategy::SequentialScan
            };

            let mut options = ExtractOptions::new()
                .with_sample_rate(every)
                .with_start_time(start_time)
                .with_end_time(end_time)
                .with_max_frames(max_frames)
                .with_strategy(strategy)
                .with_compression(compression.into());

            let progress = if cli.global.progress {
                let progress = Arc::new(TerminalProgress::new()?);
                options = options.with_progress(progress.clone());
                Some(progress)
            } else {
                None
            };

            let report =
                framesift::extract_frames_with_report(&input, &out, &date, index, &options)?;

            if let Some(progress) = progress {
                progress.bar.finish_with_message("done");
            }

            if json {
                let payload = json!({
                    "saved": report.saved_count(),
                    "frames_processed": report.frames_processed,
                    "frames_to_process": report.frames_to_process,
                    "start_frame": report.window.start_frame,
                    "end_frame": report.window.end_frame,
                    "fps": report.frame_rate,
                    "elapsed_seconds": report.elapsed.as_secs_f64(),
                    "decode_error": report.decode_error,
                    "files": report
                        .saved_frames
                        .iter()
                        .map(|path| path.display().to_string())
                        .collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                if let Some(error) = &report.decode_error {
                    eprintln!(
                        "{} {}",
                        "warning:".yellow().bold(),
                        format!("decoding ended early: {error}").yellow()
                    );
                }
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!(
                        "Extracted {} frame(s) to {} in {:.2}s",
                        report.saved_count(),
                        out.display(),
                        report.elapsed.as_secs_f64()
                    )
                    .green()
                );
            }
        }
        Commands::Rename {
            input,
            out,
            video_name,
            date,
            rate,
            video_token,
            ext,
            json,
        } => {
            let options = RenameOptions::new()
                .with_sample_rate(rate)
                .with_video_token(video_token)
                .with_extension(ext);

            let report = framesift::rename_and_copy_frames_with_report(
                &input,
                &out,
                &video_name,
                &date,
                &options,
            )?;

            if json {
                let payload = json!({
                    "files_processed": report.files_processed,
                    "copied": report.copied.len(),
                    "skipped_in_place": report.skipped_in_place,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!(
                        "Renamed and copied {} frame(s) to {}",
                        report.files_processed,
                        out.display()
                    )
                    .green()
                );
            }
        }
        Commands::Probe { input, json } => {
            let source = FfmpegSource::open(&input)?;
            let info = source.info();
            if json {
                let payload = json!({
                    "path": info.path.display().to_string(),
                    "width": info.width,
                    "height": info.height,
                    "fps": info.frames_per_second,
                    "frame_count": info.frame_count,
                    "duration_seconds": info.duration.as_secs_f64(),
                    "codec": info.codec,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Video: {}", info.path.display());
                println!(
                    "Stream: {}x{} @ {:.2} fps [{}]",
                    info.width, info.height, info.frames_per_second, info.codec
                );
                println!("Frames: {}", info.frame_count);
                println!("Duration: {:.2} seconds", info.duration.as_secs_f64());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framesift", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

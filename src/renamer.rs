//! Renaming legacy frame dumps.
//!
//! Older extractions named frames by frame *time* (`..._12.5.png`). The
//! rename pass converts each time back to a frame number at a known capture
//! rate and copies the file to the canonical name. Sources are never
//! modified or removed.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::FramesiftError,
    naming::{frame_number_from_time, has_extension, parse_frame_time, renamed_frame_name},
    options::RenameOptions,
};

/// Outcome of a rename pass.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RenameReport {
    /// Qualifying input files, including any skipped in place.
    pub files_processed: usize,
    /// Destination paths written, in input-name order.
    pub copied: Vec<PathBuf>,
    /// Inputs whose destination was the input itself.
    pub skipped_in_place: usize,
}

struct PlannedCopy {
    source: PathBuf,
    destination: PathBuf,
    frame_number: u64,
}

/// Copy every legacy frame file in `input_folder` to `output_folder` under
/// the canonical name. Returns the number of files processed.
///
/// Files whose extension does not match [`RenameOptions`] are ignored, and
/// the copies keep that extension.
/// Every name is parsed before anything is copied, so a bad name leaves the
/// output folder untouched.
///
/// # Errors
///
/// - [`FramesiftError::InputFolderMissing`] if `input_folder` does not exist.
/// - [`FramesiftError::FrameTimeParse`] if any candidate name lacks a
///   numeric frame time.
/// - [`FramesiftError::FrameTimeOutOfRange`] if a frame time is negative
///   or not finite.
/// - [`FramesiftError::Io`] for listing or copy failures.
///
/// # Example
///
/// ```no_run
/// use framesift::{FramesiftError, RenameOptions};
///
/// let count = framesift::rename_and_copy_frames(
///     "extracted_data/frames",
///     "extracted_data/renamed",
///     "00000000205000400",
///     "01-08-24",
///     &RenameOptions::new().with_sample_rate(25),
/// )?;
/// println!("{count} frames renamed");
/// # Ok::<(), FramesiftError>(())
/// ```
pub fn rename_and_copy_frames<P: AsRef<Path>, Q: AsRef<Path>>(
    input_folder: P,
    output_folder: Q,
    video_name: &str,
    video_date: &str,
    options: &RenameOptions,
) -> Result<usize, FramesiftError> {
    rename_and_copy_frames_with_report(input_folder, output_folder, video_name, video_date, options)
        .map(|report| report.files_processed)
}

/// Like [`rename_and_copy_frames`], returning the full [`RenameReport`].
pub fn rename_and_copy_frames_with_report<P: AsRef<Path>, Q: AsRef<Path>>(
    input_folder: P,
    output_folder: Q,
    video_name: &str,
    video_date: &str,
    options: &RenameOptions,
) -> Result<RenameReport, FramesiftError> {
    let input_folder = input_folder.as_ref();
    let output_folder = output_folder.as_ref();
    options.validate()?;

    if !input_folder.is_dir() {
        return Err(FramesiftError::InputFolderMissing(input_folder.to_path_buf()));
    }

    fs::create_dir_all(output_folder)?;

    let file_names = list_frame_files(input_folder, &options.extension)?;
    log::debug!(
        "Found {} .{} files in {}",
        file_names.len(),
        options.extension,
        input_folder.display()
    );

    let plan = file_names
        .iter()
        .map(|file_name| {
            let frame_time = parse_frame_time(file_name)?;
            let frame_number = frame_number_from_time(frame_time, options.sample_rate);
            Ok(PlannedCopy {
                source: input_folder.join(file_name),
                destination: output_folder.join(renamed_frame_name(
                    video_date,
                    &options.video_token,
                    video_name,
                    frame_number,
                    &options.extension,
                )),
                frame_number,
            })
        })
        .collect::<Result<Vec<_>, FramesiftError>>()?;

    let mut report = RenameReport {
        files_processed: plan.len(),
        ..RenameReport::default()
    };

    for entry in plan {
        if is_same_file(&entry.source, &entry.destination)? {
            log::warn!(
                "Skipping {}: already carries the target name",
                entry.source.display()
            );
            report.skipped_in_place += 1;
            continue;
        }

        fs::copy(&entry.source, &entry.destination)?;
        log::debug!(
            "Copied {} -> {} (frame {})",
            entry.source.display(),
            entry.destination.display(),
            entry.frame_number
        );
        report.copied.push(entry.destination);
    }

    log::info!(
        "Renamed and copied {} frames to {}",
        report.files_processed,
        output_folder.display()
    );

    Ok(report)
}

/// Names of regular files in `folder` with `extension`, sorted.
fn list_frame_files(folder: &Path, extension: &str) -> Result<Vec<String>, FramesiftError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if !has_extension(&path, extension) {
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| FramesiftError::FrameTimeParse {
                file_name: raw.to_string_lossy().into_owned(),
                token: String::new(),
            })?;
        names.push(name);
    }
    names.sort();
    Ok(names)
}

fn is_same_file(source: &Path, destination: &Path) -> Result<bool, FramesiftError> {
    if !destination.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(source)? == fs::canonicalize(destination)?)
}

//! Legacy frame renaming integration tests.

use std::fs;
use std::path::Path;

use framesift::{
    FramesiftError, RenameOptions, rename_and_copy_frames, rename_and_copy_frames_with_report,
};

fn write_file(folder: &Path, name: &str, contents: &[u8]) {
    fs::write(folder.join(name), contents).expect("Failed to write fixture file");
}

fn sorted_names(folder: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(folder)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn frame_time_converts_to_frame_number() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "x_12.5.png", b"frame-bytes");

    let count = rename_and_copy_frames(
        input.path(),
        output.path(),
        "clip",
        "01-08-24",
        &RenameOptions::new().with_sample_rate(25),
    )
    .expect("rename failed");

    assert_eq!(count, 1);
    let renamed = output.path().join("01-08-24_video1_clip_312.png");
    assert_eq!(fs::read(renamed).unwrap(), b"frame-bytes");
}

#[test]
fn source_files_are_left_untouched() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "clip_1.0.png", b"one");
    write_file(input.path(), "clip_2.0.png", b"two");

    rename_and_copy_frames(input.path(), output.path(), "clip", "01-08-24", &RenameOptions::new())
        .expect("rename failed");

    assert_eq!(sorted_names(input.path()), vec!["clip_1.0.png", "clip_2.0.png"]);
    assert_eq!(fs::read(input.path().join("clip_1.0.png")).unwrap(), b"one");
    assert_eq!(
        sorted_names(output.path()),
        vec!["01-08-24_video1_clip_25.png", "01-08-24_video1_clip_50.png"]
    );
}

#[test]
fn non_png_files_are_ignored() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "clip_1.0.png", b"png");
    write_file(input.path(), "clip_2.0.jpg", b"jpg");
    write_file(input.path(), "notes.txt", b"not a frame");
    fs::create_dir(input.path().join("nested_3.0.png")).unwrap();

    let count = rename_and_copy_frames(
        input.path(),
        output.path(),
        "clip",
        "01-08-24",
        &RenameOptions::new(),
    )
    .expect("rename failed");

    assert_eq!(count, 1);
    assert_eq!(sorted_names(output.path()), vec!["01-08-24_video1_clip_25.png"]);
}

#[test]
fn unparseable_name_aborts_before_copying() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "clip_1.0.png", b"good");
    write_file(input.path(), "clip_final.png", b"bad");

    let result = rename_and_copy_frames(
        input.path(),
        output.path(),
        "clip",
        "01-08-24",
        &RenameOptions::new(),
    );

    match result {
        Err(FramesiftError::FrameTimeParse { file_name, token }) => {
            assert_eq!(file_name, "clip_final.png");
            assert_eq!(token, "final");
        }
        other => panic!("Expected FrameTimeParse, got: {other:?}"),
    }
    assert!(sorted_names(output.path()).is_empty(), "No file may be copied");
}

#[test]
fn rerun_produces_identical_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "clip_0.04.png", &[1, 2, 3, 4]);
    write_file(input.path(), "clip_7.5.png", &[9, 8, 7]);

    let options = RenameOptions::new();
    rename_and_copy_frames(input.path(), output.path(), "clip", "01-08-24", &options)
        .expect("first run failed");
    let first: Vec<(String, Vec<u8>)> = sorted_names(output.path())
        .into_iter()
        .map(|name| {
            let bytes = fs::read(output.path().join(&name)).unwrap();
            (name, bytes)
        })
        .collect();

    rename_and_copy_frames(input.path(), output.path(), "clip", "01-08-24", &options)
        .expect("second run failed");
    let second: Vec<(String, Vec<u8>)> = sorted_names(output.path())
        .into_iter()
        .map(|name| {
            let bytes = fs::read(output.path().join(&name)).unwrap();
            (name, bytes)
        })
        .collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn video_token_is_configurable() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "clip_2.png", b"x");

    let options = RenameOptions::new()
        .with_sample_rate(30)
        .with_video_token("video3");
    rename_and_copy_frames(input.path(), output.path(), "clip", "02-08-24", &options)
        .expect("rename failed");

    assert_eq!(sorted_names(output.path()), vec!["02-08-24_video3_clip_60.png"]);
}

#[test]
fn uppercase_extension_is_accepted() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "clip_1.PNG", b"x");

    let count = rename_and_copy_frames(
        input.path(),
        output.path(),
        "clip",
        "01-08-24",
        &RenameOptions::new(),
    )
    .expect("rename failed");

    assert_eq!(count, 1);
}

#[test]
fn copies_keep_the_picked_up_extension() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "clip_1.0.jpg", b"jpeg-bytes");
    write_file(input.path(), "clip_2.0.JPG", b"more-jpeg");
    write_file(input.path(), "clip_3.0.png", b"png-bytes");

    let count = rename_and_copy_frames(
        input.path(),
        output.path(),
        "clip",
        "01-08-24",
        &RenameOptions::new().with_extension("jpg"),
    )
    .expect("rename failed");

    assert_eq!(count, 2);
    assert_eq!(
        sorted_names(output.path()),
        vec!["01-08-24_video1_clip_25.jpg", "01-08-24_video1_clip_50.jpg"]
    );
    assert_eq!(
        fs::read(output.path().join("01-08-24_video1_clip_25.jpg")).unwrap(),
        b"jpeg-bytes"
    );
}

#[test]
fn creates_missing_output_folder() {
    let input = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("renamed").join("frames");
    write_file(input.path(), "clip_1.png", b"x");

    rename_and_copy_frames(input.path(), &output, "clip", "01-08-24", &RenameOptions::new())
        .expect("rename failed");

    assert!(output.join("01-08-24_video1_clip_25.png").exists());
}

#[test]
fn missing_input_folder_is_an_error() {
    let root = tempfile::tempdir().unwrap();

    let result = rename_and_copy_frames(
        root.path().join("does_not_exist"),
        root.path().join("out"),
        "clip",
        "01-08-24",
        &RenameOptions::new(),
    );

    assert!(matches!(result, Err(FramesiftError::InputFolderMissing(_))));
}

#[test]
fn in_place_rename_never_truncates_a_source() {
    let folder = tempfile::tempdir().unwrap();
    // Already carries the canonical name: frame time 312 at rate 1 maps onto itself.
    write_file(folder.path(), "01-08-24_video1_clip_312.png", b"keep me");

    let report = rename_and_copy_frames_with_report(
        folder.path(),
        folder.path(),
        "clip",
        "01-08-24",
        &RenameOptions::new().with_sample_rate(1),
    )
    .expect("rename failed");

    assert_eq!(report.files_processed, 1);
    assert_eq!(report.skipped_in_place, 1);
    assert!(report.copied.is_empty());
    assert_eq!(
        fs::read(folder.path().join("01-08-24_video1_clip_312.png")).unwrap(),
        b"keep me"
    );
}

#[test]
fn empty_folder_processes_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let report = rename_and_copy_frames_with_report(
        input.path(),
        output.path(),
        "clip",
        "01-08-24",
        &RenameOptions::new(),
    )
    .expect("rename failed");

    assert_eq!(report.files_processed, 0);
}

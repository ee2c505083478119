// scenecut-core/tests/discovery_tests.rs

use scenecut_core::discovery::{VideoFilter, find_video_files};
use scenecut_core::error::CoreError;
use std::fs::{self, File};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_video_files_top_level() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("video1.mkv"))?;
    File::create(input_dir.join("video2.MP4"))?; // Test case insensitivity
    File::create(input_dir.join("document.txt"))?;
    File::create(input_dir.join("image.jpg"))?;
    fs::create_dir(input_dir.join("subdir"))?;
    File::create(input_dir.join("subdir").join("nested.webm"))?; // Only found recursively

    let files = find_video_files(input_dir, false)?;

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file_name().unwrap(), "video1.mkv");
    assert_eq!(files[1].file_name().unwrap(), "video2.MP4"); // Original case preserved

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_video_files_recursive() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("a.mov"))?;
    fs::create_dir_all(input_dir.join("season1").join("extras"))?;
    File::create(input_dir.join("season1").join("e01.ts"))?;
    File::create(input_dir.join("season1").join("extras").join("trailer.m4v"))?;
    File::create(input_dir.join("season1").join("notes.md"))?;

    let files = find_video_files(input_dir, true)?;

    assert_eq!(files.len(), 3);
    assert!(files.contains(&input_dir.join("a.mov")));
    assert!(files.contains(&input_dir.join("season1").join("e01.ts")));
    assert!(files.contains(&input_dir.join("season1").join("extras").join("trailer.m4v")));

    dir.close()?;
    Ok(())
}

#[test]
fn test_single_file_input() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let video = dir.path().join("clip.avi");
    File::create(&video)?;

    assert_eq!(find_video_files(&video, false)?, vec![video.clone()]);

    let text = dir.path().join("readme.txt");
    File::create(&text)?;
    assert!(matches!(find_video_files(&text, false), Err(CoreError::NoFilesFound)));
    Ok(())
}

#[test]
fn test_find_video_files_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("document.txt"))?;

    let result = find_video_files(dir.path(), true);
    match result {
        Err(CoreError::NoFilesFound) => {} // Expected error
        other => panic!("Unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_find_video_files_nonexistent_dir() {
    let non_existent_path = PathBuf::from("surely_this_does_not_exist_42_integration");
    let result = find_video_files(&non_existent_path, false);
    assert!(matches!(result, Err(CoreError::Io(_))));
}

#[test]
fn test_size_filter_on_real_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let small = dir.path().join("small.mkv");
    fs::write(&small, vec![0u8; 1024])?;

    let filter = VideoFilter {
        max_size_mb: Some(0.0005),
        max_duration_min: None,
    };
    let reason = filter.skip_reason(&small)?;
    assert!(reason.is_some_and(|r| r.contains("size")));

    let unlimited = VideoFilter::default();
    assert_eq!(unlimited.skip_reason(&small)?, None);
    Ok(())
}

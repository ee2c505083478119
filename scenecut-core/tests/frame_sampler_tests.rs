// scenecut-core/tests/frame_sampler_tests.rs
//
// VFR-safe frame retrieval against a mock reader with scripted seek landings.

use scenecut_core::config::FrameAccess;
use scenecut_core::error::CoreError;
use scenecut_core::external::mocks::{MockVideo, MockVideoSource, mock_frame};
use scenecut_core::processing::FrameSampler;

use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const MARGIN: usize = 10;

// Helper function to create a dummy file standing in for a video
fn create_dummy_file(dir: &Path, name: &str) -> Result<PathBuf, std::io::Error> {
    let path = dir.join(name);
    File::create(&path)?;
    Ok(path)
}

fn setup(
    frame_count: usize,
) -> Result<(TempDir, PathBuf, FrameSampler<MockVideoSource>), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = create_dummy_file(dir.path(), "clip.mkv")?;
    let source = MockVideoSource::new();
    source.add_video(&path, MockVideo::new(frame_count, 23.976));
    Ok((dir, path, FrameSampler::with_safety_margin(source, MARGIN)))
}

#[test]
fn test_exact_landing_reads_directly() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(100)?;

    let frame = sampler.get_frame(&path, 30)?;

    assert_eq!(frame, mock_frame(30));
    let stats = sampler.source().stats();
    assert_eq!(stats.seeks, vec![30]);
    assert_eq!(stats.grabs, 0);
    assert_eq!(stats.reads, 1);
    Ok(())
}

#[test]
fn test_early_landing_walks_forward() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(100)?;
    sampler.source().script_landings([-7]);

    let frame = sampler.get_frame(&path, 30)?;

    assert_eq!(frame, mock_frame(30));
    let stats = sampler.source().stats();
    assert_eq!(stats.seeks, vec![30]);
    assert_eq!(stats.grabs, 7);
    Ok(())
}

#[test]
fn test_overshoot_retries_from_safety_margin() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(100)?;
    // First seek lands 5 frames late; the retry lands where asked
    sampler.source().script_landings([5]);

    let frame = sampler.get_frame(&path, 30)?;

    assert_eq!(frame, mock_frame(30));
    let stats = sampler.source().stats();
    assert_eq!(stats.seeks, vec![30, 30 - MARGIN]);
    assert_eq!(stats.grabs, MARGIN);
    Ok(())
}

#[test]
fn test_repeated_overshoot_rewinds_to_start() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(100)?;
    // The retry from 20 lands at 35, still past the target
    sampler.source().script_landings([5, 15]);

    let frame = sampler.get_frame(&path, 30)?;

    assert_eq!(frame, mock_frame(30));
    let stats = sampler.source().stats();
    assert_eq!(stats.seeks, vec![30, 20, 0]);
    assert_eq!(stats.grabs, 30);
    Ok(())
}

#[test]
fn test_overshoot_near_start_retries_from_zero() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(100)?;
    sampler.source().script_landings([3]);

    let frame = sampler.get_frame(&path, 4)?;

    assert_eq!(frame, mock_frame(4));
    assert_eq!(sampler.source().stats().seeks, vec![4, 0]);
    Ok(())
}

#[test]
fn test_last_frame_and_out_of_range() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(50)?;

    assert_eq!(sampler.get_frame(&path, 49)?, mock_frame(49));

    match sampler.get_frame(&path, 50) {
        Err(CoreError::FrameIndexOutOfRange { index, frame_count, .. }) => {
            assert_eq!(index, 50);
            assert_eq!(frame_count, 50);
        }
        other => panic!("Expected FrameIndexOutOfRange, got {:?}", other.err()),
    }
    Ok(())
}

#[test]
fn test_missing_path_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let (dir, _path, sampler) = setup(50)?;
    let result = sampler.get_frame(&dir.path().join("nope.mkv"), 0);
    assert!(matches!(result, Err(CoreError::NotFound(_))));
    assert_eq!(sampler.source().stats().opens, 0);
    Ok(())
}

#[test]
fn test_reader_released_on_success_and_failure() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = create_dummy_file(dir.path(), "clip.mkv")?;
    let source = MockVideoSource::new();
    source.add_video(&path, MockVideo::new(50, 25.0).with_unreadable(20));
    let sampler = FrameSampler::with_safety_margin(source, MARGIN);

    sampler.get_frame(&path, 10)?;
    assert!(sampler.get_frame(&path, 20).is_err());
    assert!(sampler.get_frame(&path, 99).is_err());
    assert!(sampler.get_frames(&path, &[5, 20], FrameAccess::ForwardWalk).is_err());

    let stats = sampler.source().stats();
    assert_eq!(stats.opens, 4);
    assert_eq!(stats.releases, stats.opens);
    Ok(())
}

#[test]
fn test_get_frames_preserves_request_order() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(100)?;

    let frames = sampler.get_frames(&path, &[60, 5, 33], FrameAccess::Independent)?;

    assert_eq!(frames, vec![mock_frame(60), mock_frame(5), mock_frame(33)]);
    Ok(())
}

#[test]
fn test_forward_walk_uses_one_reader() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(500)?;
    let indices = [2, 9, 15, 200, 205];

    let frames = sampler.get_frames(&path, &indices, FrameAccess::ForwardWalk)?;

    let expected: Vec<_> = indices.iter().map(|&i| mock_frame(i)).collect();
    assert_eq!(frames, expected);
    let stats = sampler.source().stats();
    assert_eq!(stats.opens, 1);
    assert_eq!(stats.releases, 1);
    // Only the jump from 16 to 200 exceeds the safety margin
    assert_eq!(stats.seeks, vec![200]);
    Ok(())
}

#[test]
fn test_forward_walk_survives_vfr_drift() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(500)?;
    sampler.source().script_landings([4]);

    let frames = sampler.get_frames(&path, &[3, 300], FrameAccess::ForwardWalk)?;

    assert_eq!(frames, vec![mock_frame(3), mock_frame(300)]);
    assert_eq!(sampler.source().stats().seeks, vec![300, 290]);
    Ok(())
}

#[test]
fn test_forward_walk_rejects_decreasing_indices() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, sampler) = setup(100)?;
    let result = sampler.get_frames(&path, &[40, 10], FrameAccess::ForwardWalk);
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    Ok(())
}

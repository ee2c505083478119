// scenecut-core/tests/change_signal_tests.rs
//
// scdet-based change signal collection driven by a mock ffmpeg spawner.

use scenecut_core::error::CoreError;
use scenecut_core::external::mocks::MockFfmpegSpawner;
use scenecut_core::processing::{ChangeSignalSource, ScdetChangeSignal};

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::Path;
use tempfile::tempdir;

fn metadata_log(body: &str) -> FfmpegEvent {
    FfmpegEvent::Log(
        LogLevel::Info,
        format!("[Parsed_metadata_1 @ 0x55d0c8a4e2c0] {body}"),
    )
}

fn scdet_events(scores: &[f64]) -> Vec<FfmpegEvent> {
    let mut events = vec![FfmpegEvent::Log(
        LogLevel::Info,
        "Stream #0:0: Video: h264 (High), yuv420p, 1920x1080, 25 fps".to_string(),
    )];
    for (frame, score) in scores.iter().enumerate() {
        events.push(metadata_log(&format!(
            "frame:{frame:<4} pts:{}  pts_time:{}",
            frame * 512,
            frame as f64 / 25.0
        )));
        events.push(metadata_log("lavfi.scdet.mafd=1.000"));
        events.push(metadata_log(&format!("lavfi.scdet.score={score:.3}")));
    }
    events.push(FfmpegEvent::Done);
    events
}

#[test]
fn test_collects_one_sample_per_frame() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("scdet", scdet_events(&[0.0, 1.5, 12.25, 0.5]));
    let signal = ScdetChangeSignal::with_spawner(spawner.clone());

    let samples = signal.collect_samples(Path::new("/videos/movie.mkv"), 25.0)?;

    assert_eq!(samples.len(), 4);
    let frames: Vec<usize> = samples.iter().map(|s| s.frame_number).collect();
    assert_eq!(frames, vec![0, 1, 2, 3]);
    assert!((samples[2].content_val - 12.25).abs() < 1e-9);
    assert!((samples[2].timecode - 0.08).abs() < 1e-9);

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].iter().any(|arg| arg == "scdet=threshold=100,metadata=print"));
    assert!(calls[0].iter().any(|arg| arg == "/videos/movie.mkv"));
    Ok(())
}

#[test]
fn test_ffmpeg_failure_is_command_failed() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_exit_error_expectation(
        "scdet",
        vec![FfmpegEvent::Error("Invalid data found when processing input".to_string())],
        1,
    );
    let signal = ScdetChangeSignal::with_spawner(spawner);

    match signal.collect_samples(Path::new("/videos/broken.mkv"), 25.0) {
        Err(CoreError::CommandFailed { stderr, .. }) => {
            assert!(stderr.contains("Invalid data"));
        }
        other => panic!("Expected CommandFailed, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_video_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let signal = ScdetChangeSignal::with_spawner(MockFfmpegSpawner::new());

    let result = signal.change_samples(&dir.path().join("missing.mkv"));

    assert!(matches!(result, Err(CoreError::NotFound(_))));
    Ok(())
}

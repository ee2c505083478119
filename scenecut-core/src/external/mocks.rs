// scenecut-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::{FfmpegProcess, FfmpegSpawner};
use crate::error::{CoreError, CoreResult};
use crate::media::{Frame, VideoReader, VideoSource};
use crate::processing::change_signal::ChangeSignalSource;
use crate::processing::types::ChangeSample;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use image::{DynamicImage, Rgb, RgbImage};
use std::collections::{HashMap, HashSet, VecDeque};
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

// ============================================================================
// FFMPEG
// ============================================================================

/// Mock implementation of FfmpegProcess replaying a fixed list of events.
pub struct MockFfmpegProcess {
    events: VecDeque<FfmpegEvent>,
    exit_status: ExitStatus,
    kills: Arc<AtomicUsize>,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn next_event(&mut self) -> CoreResult<Option<FfmpegEvent>> {
        Ok(self.events.pop_front())
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.kills.fetch_add(1, Ordering::SeqCst);
        self.events.clear();
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
struct MockFfmpegExpectation {
    arg_pattern: String,
    result: CoreResult<(Vec<FfmpegEvent>, ExitStatus)>,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawn consumes the first expectation whose pattern occurs in any
/// argument of the command.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Arc<Mutex<Vec<MockFfmpegExpectation>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
    kills: Arc<AtomicUsize>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, events: Vec<FfmpegEvent>) {
        self.push(arg_pattern, Ok((events, ExitStatus::from_raw(0))));
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.push(arg_pattern, Err(error));
    }

    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        // Raw wait status carries the exit code in the second byte
        self.push(arg_pattern, Ok((events, ExitStatus::from_raw(exit_code << 8))));
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        lock(&self.received_calls).clone()
    }

    /// Number of times a spawned process was killed.
    pub fn kill_count(&self) -> usize {
        self.kills.load(Ordering::SeqCst)
    }

    fn push(&self, arg_pattern: &str, result: CoreResult<(Vec<FfmpegEvent>, ExitStatus)>) {
        lock(&self.expectations).push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
        });
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        lock(&self.received_calls).push(args.clone());

        let mut expectations = lock(&self.expectations);
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
            panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
        };

        let expectation = expectations.remove(index);
        log::debug!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );
        expectation.result.map(|(events, exit_status)| MockFfmpegProcess {
            events: events.into(),
            exit_status,
            kills: Arc::clone(&self.kills),
        })
    }
}

// ============================================================================
// VIDEO READER
// ============================================================================

/// Deterministic frame for `index`: a 4x4 solid RGB image whose colour
/// encodes the index.
pub fn mock_frame(index: usize) -> Frame {
    let colour = Rgb([(index & 0xff) as u8, ((index >> 8) & 0xff) as u8, 0x40]);
    DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, colour))
}

/// An in-memory video registered with a `MockVideoSource`.
#[derive(Debug, Clone)]
pub struct MockVideo {
    frame_count: usize,
    frame_rate: f64,
    overrides: HashMap<usize, Frame>,
    unreadable: HashSet<usize>,
}

impl MockVideo {
    /// A video whose frames default to `mock_frame(index)`.
    pub fn new(frame_count: usize, frame_rate: f64) -> Self {
        Self {
            frame_count,
            frame_rate,
            overrides: HashMap::new(),
            unreadable: HashSet::new(),
        }
    }

    /// Replaces the image decoded at `index`.
    pub fn with_frame(mut self, index: usize, frame: Frame) -> Self {
        self.overrides.insert(index, frame);
        self
    }

    /// Makes `read()` return no frame at `index`.
    pub fn with_unreadable(mut self, index: usize) -> Self {
        self.unreadable.insert(index);
        self
    }

    fn frame(&self, index: usize) -> Frame {
        self.overrides
            .get(&index)
            .cloned()
            .unwrap_or_else(|| mock_frame(index))
    }
}

/// Counters describing how readers were used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockReaderStats {
    pub opens: usize,
    pub releases: usize,
    /// Every seek target in call order
    pub seeks: Vec<usize>,
    pub grabs: usize,
    pub reads: usize,
}

#[derive(Default)]
struct MockState {
    videos: HashMap<PathBuf, MockVideo>,
    // Landing offset applied to successive non-zero seeks
    landing_offsets: VecDeque<isize>,
    stats: MockReaderStats,
}

/// Mock implementation of VideoSource backed by in-memory videos.
///
/// Seeks land exactly on their target unless a landing offset has been
/// scripted, in which case the next non-zero seek lands `offset` frames
/// away. Seeking to frame 0 always lands on frame 0.
#[derive(Clone, Default)]
pub struct MockVideoSource {
    state: Arc<Mutex<MockState>>,
}

impl MockVideoSource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_video(&self, path: &Path, video: MockVideo) {
        lock(&self.state).videos.insert(path.to_path_buf(), video);
    }

    /// Queues landing offsets for the following non-zero seeks.
    pub fn script_landings(&self, offsets: impl IntoIterator<Item = isize>) {
        lock(&self.state).landing_offsets.extend(offsets);
    }

    pub fn stats(&self) -> MockReaderStats {
        lock(&self.state).stats.clone()
    }
}

impl VideoSource for MockVideoSource {
    type Reader = MockVideoReader;

    fn open(&self, path: &Path) -> CoreResult<Self::Reader> {
        let mut state = lock(&self.state);
        let video = state.videos.get(path).cloned().ok_or_else(|| {
            CoreError::VideoInfo(format!("No mock video registered for {}", path.display()))
        })?;
        state.stats.opens += 1;
        Ok(MockVideoReader {
            state: Arc::clone(&self.state),
            video,
            position: 0,
        })
    }
}

/// Reader handle produced by `MockVideoSource`. Dropping it counts as a release.
pub struct MockVideoReader {
    state: Arc<Mutex<MockState>>,
    video: MockVideo,
    position: usize,
}

impl VideoReader for MockVideoReader {
    fn frame_count(&self) -> usize {
        self.video.frame_count
    }

    fn frame_rate(&self) -> f64 {
        self.video.frame_rate
    }

    fn seek(&mut self, index: usize) -> CoreResult<()> {
        let mut state = lock(&self.state);
        state.stats.seeks.push(index);
        let offset = if index == 0 {
            0
        } else {
            state.landing_offsets.pop_front().unwrap_or(0)
        };
        let landed = (index as isize + offset).clamp(0, self.video.frame_count as isize);
        self.position = landed as usize;
        Ok(())
    }

    fn position(&mut self) -> CoreResult<usize> {
        Ok(self.position)
    }

    fn read(&mut self) -> CoreResult<Option<Frame>> {
        lock(&self.state).stats.reads += 1;
        if self.position >= self.video.frame_count || self.video.unreadable.contains(&self.position) {
            return Ok(None);
        }
        let frame = self.video.frame(self.position);
        self.position += 1;
        Ok(Some(frame))
    }

    fn grab(&mut self) -> CoreResult<bool> {
        if self.position >= self.video.frame_count {
            return Ok(false);
        }
        lock(&self.state).stats.grabs += 1;
        self.position += 1;
        Ok(true)
    }
}

impl Drop for MockVideoReader {
    fn drop(&mut self) {
        lock(&self.state).stats.releases += 1;
    }
}

// ============================================================================
// CHANGE SIGNAL
// ============================================================================

/// Change signal returning pre-built samples.
#[derive(Debug, Clone, Default)]
pub struct StaticChangeSignal {
    default: Option<Vec<ChangeSample>>,
    per_path: HashMap<PathBuf, Vec<ChangeSample>>,
}

impl StaticChangeSignal {
    /// Returns `samples` for every path.
    pub fn new(samples: Vec<ChangeSample>) -> Self {
        Self {
            default: Some(samples),
            per_path: HashMap::new(),
        }
    }

    /// Returns `samples` for `path` only.
    pub fn with_video(mut self, path: &Path, samples: Vec<ChangeSample>) -> Self {
        self.per_path.insert(path.to_path_buf(), samples);
        self
    }
}

impl ChangeSignalSource for StaticChangeSignal {
    fn change_samples(&self, path: &Path) -> CoreResult<Vec<ChangeSample>> {
        self.per_path
            .get(path)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))
    }
}

// A poisoned lock only means another test thread panicked; keep going with its data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

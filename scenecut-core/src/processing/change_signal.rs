// ============================================================================
// scenecut-core/src/processing/change_signal.rs
// ============================================================================
//
// CHANGE SIGNAL: Per-Frame Visual Change Magnitudes
//
// The scene detector consumes a raw change value for every frame. The
// production source runs ffmpeg's scdet filter with its cut threshold pushed
// to the maximum, so no frame is classified as a cut and every frame's score
// is printed by the metadata filter:
//
//   [Parsed_metadata_1 @ 0x..] frame:41   pts:41984   pts_time:1.64
//   [Parsed_metadata_1 @ 0x..] lavfi.scdet.mafd=12.301
//   [Parsed_metadata_1 @ 0x..] lavfi.scdet.score=9.750
//
// AI-ASSISTANT-INFO: Change-signal collaborator backed by ffmpeg scdet

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_executor::run_collecting_logs;
use crate::external::{FfmpegSpawner, SidecarSpawner, get_video_properties};
use crate::processing::types::ChangeSample;

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;

// ---- Standard library imports ----
use std::path::Path;

/// scdet filter chain that reports every frame's score without cutting.
const SCDET_FILTER: &str = "scdet=threshold=100,metadata=print";

/// Produces the raw change signal of a video.
pub trait ChangeSignalSource {
    /// Returns one sample per analysed frame, frame numbers strictly increasing.
    fn change_samples(&self, path: &Path) -> CoreResult<Vec<ChangeSample>>;
}

/// Change signal computed by ffmpeg's scdet filter.
#[derive(Debug, Clone, Default)]
pub struct ScdetChangeSignal<S = SidecarSpawner> {
    spawner: S,
}

impl ScdetChangeSignal<SidecarSpawner> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: FfmpegSpawner> ScdetChangeSignal<S> {
    pub fn with_spawner(spawner: S) -> Self {
        Self { spawner }
    }

    /// Runs scdet over `path` and converts its scores to samples, deriving
    /// timecodes from `frame_rate`.
    pub fn collect_samples(&self, path: &Path, frame_rate: f64) -> CoreResult<Vec<ChangeSample>> {
        let mut cmd = FfmpegCommand::new();
        cmd.input(path.to_string_lossy().as_ref());
        cmd.args(["-map", "0:v:0"]);
        cmd.args(["-vf", SCDET_FILTER]);
        cmd.args(["-fps_mode", "passthrough"]);
        cmd.arg("-an");
        cmd.arg("-sn");
        cmd.args(["-f", "null"]);
        cmd.output("-");

        log::info!("Collecting change signal for {}", path.display());
        let mut parser = ScdetLogParser::new(frame_rate);
        run_collecting_logs(&self.spawner, cmd, "scdet", |line| parser.feed(line))?;

        let samples = parser.finish();
        log::info!(
            "Collected {} change samples for {}",
            samples.len(),
            path.display()
        );
        Ok(samples)
    }
}

impl<S: FfmpegSpawner> ChangeSignalSource for ScdetChangeSignal<S> {
    fn change_samples(&self, path: &Path) -> CoreResult<Vec<ChangeSample>> {
        if !path.exists() {
            return Err(CoreError::NotFound(path.to_path_buf()));
        }
        let properties = get_video_properties(path)?;
        self.collect_samples(path, properties.frame_rate)
    }
}

/// Pairs `frame:` lines with the `lavfi.scdet.score=` line that follows them.
struct ScdetLogParser {
    frame_rate: f64,
    current_frame: Option<usize>,
    samples: Vec<ChangeSample>,
}

impl ScdetLogParser {
    fn new(frame_rate: f64) -> Self {
        Self {
            frame_rate,
            current_frame: None,
            samples: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        if let Some(frame) = value_after(line, "frame:").and_then(|v| v.parse::<usize>().ok()) {
            self.current_frame = Some(frame);
            return;
        }

        let Some(score) = value_after(line, "lavfi.scdet.score=").and_then(|v| v.parse::<f64>().ok())
        else {
            return;
        };
        let Some(frame) = self.current_frame.take() else {
            log::warn!("scdet score without a preceding frame line: {}", line);
            return;
        };
        if !score.is_finite() || score < 0.0 {
            log::warn!("Ignoring invalid scdet score {} for frame {}", score, frame);
            return;
        }
        if let Some(last) = self.samples.last() {
            if frame <= last.frame_number {
                log::warn!("Ignoring out-of-order scdet frame {} after {}", frame, last.frame_number);
                return;
            }
        }
        self.samples.push(ChangeSample::new(frame, self.frame_rate, score));
    }

    fn finish(self) -> Vec<ChangeSample> {
        self.samples
    }
}

/// Token following `key` in a metadata filter line.
fn value_after<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    if !line.contains("Parsed_metadata") {
        return None;
    }
    let start = line.find(key)? + key.len();
    line[start..].split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str], frame_rate: f64) -> Vec<ChangeSample> {
        let mut parser = ScdetLogParser::new(frame_rate);
        for line in lines {
            parser.feed(line);
        }
        parser.finish()
    }

    #[test]
    fn test_parses_frame_and_score_pairs() {
        let samples = parse(
            &[
                "[Parsed_metadata_1 @ 0x5e0] frame:0    pts:0       pts_time:0",
                "[Parsed_metadata_1 @ 0x5e0] lavfi.scdet.mafd=0.000",
                "[Parsed_metadata_1 @ 0x5e0] lavfi.scdet.score=0.000",
                "[Parsed_metadata_1 @ 0x5e0] frame:1    pts:512     pts_time:0.04",
                "[Parsed_metadata_1 @ 0x5e0] lavfi.scdet.mafd=14.250",
                "[Parsed_metadata_1 @ 0x5e0] lavfi.scdet.score=9.125",
            ],
            25.0,
        );
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].frame_number, 1);
        assert!((samples[1].timecode - 0.04).abs() < 1e-12);
        assert!((samples[1].content_val - 9.125).abs() < 1e-12);
    }

    #[test]
    fn test_ignores_unrelated_lines() {
        let samples = parse(
            &[
                "frame=  120 fps=0.0 q=-0.0 size=N/A time=00:00:04.80",
                "[Parsed_metadata_1 @ 0x5e0] lavfi.scdet.score=3.000",
                "Stream #0:0: Video: h264",
            ],
            25.0,
        );
        assert!(samples.is_empty());
    }
}

// ============================================================================
// scenecut-core/src/processing/movie_analyzer.rs
// ============================================================================
//
// MOVIE ANALYZER: Whole-Video Driver for Scene Detection
//
// Collects the change signal of a video, runs the scene detector over it and
// optionally keeps only the most prominent scenes. Also summarises the raw
// signal and searches for the min_prominence that yields a target number of
// candidates, which helps tune a config for a collection of similar videos.
//
// Videos are independent, so batches run one worker per file (rayon). Inside
// a single video everything stays sequential.
//
// KEY COMPONENTS:
// - MovieAnalyzer / MovieAnalysis
// - cap_by_prominence: top-N selection with a deterministic tie-break
// - SignalStatistics
// - ProminenceCalibration
//
// AI-ASSISTANT-INFO: Whole-video scene analysis, statistics and batch runs

// ---- Internal crate imports ----
use crate::config::SceneDetectionConfig;
use crate::error::{CoreError, CoreResult};
use crate::media::VideoSource;
use crate::processing::change_signal::ChangeSignalSource;
use crate::processing::peaks::find_peaks;
use crate::processing::scene_detector::SceneChangeDetector;
use crate::processing::types::{ChangeSample, SceneRecord, validate_samples};

// ---- External crate imports ----
use rayon::prelude::*;
use serde::Serialize;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Bisection steps used by `min_prominence_for_scene_count`.
const CALIBRATION_ITERATIONS: usize = 20;

/// Result of analysing one video.
#[derive(Debug, Clone)]
pub struct MovieAnalysis {
    pub path: PathBuf,
    /// The full raw change signal
    pub samples: Vec<ChangeSample>,
    /// Final scenes, in frame order
    pub scenes: Vec<SceneRecord>,
    pub statistics: SignalStatistics,
}

/// Summary of the raw content values of a change signal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SignalStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SignalStatistics {
    /// Computes statistics over `samples`; all zero for an empty signal.
    pub fn from_samples(samples: &[ChangeSample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut values: Vec<f64> = samples.iter().map(|s| s.content_val).collect();
        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        } else {
            values[count / 2]
        };

        Self {
            count,
            mean,
            median,
            std_dev: variance.sqrt(),
            min: values[0],
            max: values[count - 1],
        }
    }
}

/// Outcome of a min_prominence search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProminenceCalibration {
    pub min_prominence: f64,
    /// Candidates produced at that setting, before deduplication
    pub candidate_count: usize,
}

/// Keeps the `max_scenes` most prominent scenes, returned in frame order.
///
/// Equal prominences are broken in favour of the earlier frame, so the
/// selection is deterministic.
pub fn cap_by_prominence(mut scenes: Vec<SceneRecord>, max_scenes: usize) -> Vec<SceneRecord> {
    if scenes.len() <= max_scenes {
        return scenes;
    }
    scenes.sort_by(|a, b| {
        b.prominence
            .total_cmp(&a.prominence)
            .then(a.frame_number.cmp(&b.frame_number))
    });
    scenes.truncate(max_scenes);
    scenes.sort_by_key(|scene| scene.frame_number);
    scenes
}

/// Runs change-signal extraction and scene detection over whole videos.
pub struct MovieAnalyzer<C, V> {
    signal: C,
    detector: SceneChangeDetector<V>,
}

impl<C: ChangeSignalSource, V: VideoSource> MovieAnalyzer<C, V> {
    /// Creates an analyzer.
    ///
    /// # Arguments
    ///
    /// * `config` - Detection parameters, including the optional scene cap
    /// * `signal` - Produces the per-frame change values
    /// * `source` - Opens videos for candidate frame access
    pub fn new(config: SceneDetectionConfig, signal: C, source: V) -> CoreResult<Self> {
        Ok(Self {
            signal,
            detector: SceneChangeDetector::new(config, source)?,
        })
    }

    /// Aborts running analyses at their next frame fetch once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.detector = self.detector.with_cancellation(flag);
        self
    }

    /// The change-signal source `analyze` reads samples from.
    pub fn signal(&self) -> &C {
        &self.signal
    }

    pub fn detector(&self) -> &SceneChangeDetector<V> {
        &self.detector
    }

    pub fn config(&self) -> &SceneDetectionConfig {
        self.detector.config()
    }

    /// Analyses one video.
    ///
    /// # Returns
    ///
    /// * `Ok(MovieAnalysis)` - Signal, statistics and final scenes
    /// * `Err(CoreError)` - From signal extraction or scene detection
    pub fn analyze(&self, path: &Path) -> CoreResult<MovieAnalysis> {
        let samples = self.signal.change_samples(path)?;
        let statistics = SignalStatistics::from_samples(&samples);

        let mut scenes = self.detector.detect_scenes(path, &samples)?;
        if let Some(max_scenes) = self.config().max_scenes {
            if scenes.len() > max_scenes {
                log::info!(
                    "Capping {} scenes to the {} most prominent for {}",
                    scenes.len(),
                    max_scenes,
                    path.display()
                );
                scenes = cap_by_prominence(scenes, max_scenes);
            }
        }

        Ok(MovieAnalysis {
            path: path.to_path_buf(),
            samples,
            scenes,
            statistics,
        })
    }

    /// Analyses several videos in parallel, one worker per file.
    ///
    /// Results come back in input order; a failure in one video does not
    /// affect the others.
    pub fn analyze_batch(&self, paths: &[PathBuf]) -> Vec<(PathBuf, CoreResult<MovieAnalysis>)>
    where
        C: Sync,
        V: Sync,
    {
        log::info!("Analysing {} videos", paths.len());
        paths
            .par_iter()
            .map(|path| {
                let result = self.analyze(path);
                if let Err(e) = &result {
                    log::warn!("Analysis of {} failed: {}", path.display(), e);
                }
                (path.clone(), result)
            })
            .collect()
    }

    /// Finds the min_prominence whose candidate count is closest to
    /// `target_count`, by bisection between 0 and the signal's peak value.
    ///
    /// Only the smoothing and peak stages run; no frames are decoded.
    pub fn min_prominence_for_scene_count(
        &self,
        samples: &[ChangeSample],
        target_count: usize,
    ) -> CoreResult<ProminenceCalibration> {
        if samples.is_empty() {
            return Err(CoreError::InvalidInput(
                "cannot calibrate on an empty change signal".to_string(),
            ));
        }
        validate_samples(samples)?;

        let smoothed = self.detector.smoothed_series(samples)?;
        let min_height = self.config().min_height;
        let count_at = |prominence: f64| find_peaks(&smoothed, min_height, prominence).len();

        let mut low = 0.0;
        let mut high = smoothed.iter().fold(0.0_f64, |acc, &v| acc.max(v));
        let mut best = ProminenceCalibration {
            min_prominence: self.config().min_prominence,
            candidate_count: count_at(self.config().min_prominence),
        };
        let mut best_diff = best.candidate_count.abs_diff(target_count);

        for _ in 0..CALIBRATION_ITERATIONS {
            let mid = (low + high) / 2.0;
            let count = count_at(mid);
            let diff = count.abs_diff(target_count);
            log::debug!(
                "min_prominence {:.3} -> {} candidates (target {})",
                mid,
                count,
                target_count
            );

            if diff < best_diff {
                best_diff = diff;
                best = ProminenceCalibration {
                    min_prominence: mid,
                    candidate_count: count,
                };
            }

            if count < target_count {
                high = mid;
            } else if count > target_count {
                low = mid;
            } else {
                break;
            }
        }

        log::info!(
            "Best min_prominence {:.3} produces {} candidates (target {})",
            best.min_prominence,
            best.candidate_count,
            target_count
        );
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::mock_frame;

    fn scene(frame_number: usize, prominence: f64) -> SceneRecord {
        SceneRecord {
            frame_number,
            prominence,
            smoothed_content_val: prominence,
            content_val: prominence,
            frame_image: mock_frame(frame_number),
        }
    }

    #[test]
    fn test_cap_keeps_most_prominent_in_frame_order() {
        let scenes = vec![scene(10, 5.0), scene(20, 9.0), scene(30, 1.0), scene(40, 7.0)];
        let capped = cap_by_prominence(scenes, 2);
        let frames: Vec<usize> = capped.iter().map(|s| s.frame_number).collect();
        assert_eq!(frames, vec![20, 40]);
    }

    #[test]
    fn test_cap_tie_prefers_earlier_frame() {
        let scenes = vec![scene(10, 4.0), scene(20, 6.0), scene(30, 4.0), scene(40, 4.0)];
        let capped = cap_by_prominence(scenes, 2);
        let frames: Vec<usize> = capped.iter().map(|s| s.frame_number).collect();
        assert_eq!(frames, vec![10, 20]);
    }

    #[test]
    fn test_cap_larger_than_set_is_noop() {
        let scenes = vec![scene(10, 5.0), scene(20, 9.0)];
        assert_eq!(cap_by_prominence(scenes.clone(), 5), scenes);
    }

    #[test]
    fn test_statistics() {
        let samples = ChangeSample::series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 25.0);
        let stats = SignalStatistics::from_samples(&samples);
        assert_eq!(stats.count, 8);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.median - 4.5).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_statistics_empty_signal() {
        assert_eq!(SignalStatistics::from_samples(&[]), SignalStatistics::default());
    }
}

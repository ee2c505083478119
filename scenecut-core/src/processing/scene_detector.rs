// ============================================================================
// scenecut-core/src/processing/scene_detector.rs
// ============================================================================
//
// SCENE CHANGE DETECTOR: Peaks of the Change Signal, Minus Near-Duplicates
//
// 1. Smooth the raw change values with a Gaussian (sigma from the config)
// 2. Keep local maxima that pass the height and prominence thresholds
// 3. Fetch each candidate's frame through the VFR-safe frame sampler
// 4. Walk candidates in frame order, dropping any whose frame is more similar
//    than the threshold to ANY frame kept so far
//
// A candidate whose frame cannot be read aborts the whole call. Dropping it
// silently would look exactly like "no scene change here".
//
// KEY COMPONENTS:
// - SceneChangeDetector: configured detector over a VideoSource
//
// AI-ASSISTANT-INFO: Scene boundary detection and deduplication

// ---- Internal crate imports ----
use crate::config::SceneDetectionConfig;
use crate::error::{CoreError, CoreResult, frame_read_error};
use crate::media::{Frame, VideoSource};
use crate::processing::frame_sampler::FrameSampler;
use crate::processing::peaks::find_peaks;
use crate::processing::similarity::SimilarityScorer;
use crate::processing::smoothing::smooth;
use crate::processing::types::{CandidateScene, ChangeSample, SceneRecord, validate_samples};

// ---- Standard library imports ----
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Detects scene boundaries in one video's change signal.
///
/// The detector holds no per-call state: repeated `detect_scenes` calls with
/// the same input return identical results.
pub struct SceneChangeDetector<V> {
    config: SceneDetectionConfig,
    sampler: FrameSampler<V>,
    scorer: SimilarityScorer,
    cancel: Option<Arc<AtomicBool>>,
}

impl<V: VideoSource> SceneChangeDetector<V> {
    /// Creates a detector, validating the configuration eagerly.
    ///
    /// # Arguments
    ///
    /// * `config` - Smoothing, peak and deduplication parameters
    /// * `source` - Opens the video for candidate frame access
    ///
    /// # Returns
    ///
    /// * `Ok(SceneChangeDetector)` - A ready detector
    /// * `Err(CoreError::Config)` - If any parameter is invalid
    pub fn new(config: SceneDetectionConfig, source: V) -> CoreResult<Self> {
        config.validate()?;
        let scorer = SimilarityScorer::from_config(&config)?;
        let sampler = FrameSampler::with_safety_margin(source, config.vfr_safety_margin);
        Ok(Self {
            config,
            sampler,
            scorer,
            cancel: None,
        })
    }

    /// Installs a flag that aborts `detect_scenes` with `CoreError::Cancelled`
    /// before the next frame fetch once it is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SceneDetectionConfig {
        &self.config
    }

    pub fn sampler(&self) -> &FrameSampler<V> {
        &self.sampler
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    /// Gaussian-smoothed content values, aligned index for index with `samples`.
    pub fn smoothed_series(&self, samples: &[ChangeSample]) -> CoreResult<Vec<f64>> {
        let values: Vec<f64> = samples.iter().map(|s| s.content_val).collect();
        smooth(&values, self.config.sigma)
    }

    /// Peaks of the smoothed signal as candidate scenes, in frame order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CandidateScene>)` - Possibly empty
    /// * `Err(CoreError::InvalidInput)` - If frame numbers are not strictly
    ///   increasing or a content value is negative or not finite
    pub fn detect_candidates(&self, samples: &[ChangeSample]) -> CoreResult<Vec<CandidateScene>> {
        validate_samples(samples)?;
        let smoothed = self.smoothed_series(samples)?;

        let candidates = find_peaks(&smoothed, self.config.min_height, self.config.min_prominence)
            .into_iter()
            .map(|peak| CandidateScene {
                frame_number: samples[peak.index].frame_number,
                prominence: peak.prominence,
                smoothed_content_val: smoothed[peak.index],
                content_val: samples[peak.index].content_val,
            })
            .collect();
        Ok(candidates)
    }

    /// Detects scene boundaries of the video at `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SceneRecord>)` - Frame-ordered scenes with their images
    /// * `Err(CoreError::FrameRead)` - If any candidate's frame cannot be read,
    ///   including a candidate past the end of the video
    /// * `Err(CoreError::Cancelled)` - If the cancellation flag was set
    pub fn detect_scenes(&self, path: &Path, samples: &[ChangeSample]) -> CoreResult<Vec<SceneRecord>> {
        let candidates = self.detect_candidates(samples)?;
        log::info!(
            "Found {} candidate scenes in {} samples of {}",
            candidates.len(),
            samples.len(),
            path.display()
        );

        match candidates.as_slice() {
            [] => return Ok(Vec::new()),
            [only] => {
                self.check_cancelled()?;
                let frame = self
                    .sampler
                    .get_frame(path, only.frame_number)
                    .map_err(|e| candidate_fetch_error(path, e))?;
                return Ok(vec![SceneRecord::from_candidate(only, frame)]);
            }
            _ => {}
        }

        let indices: Vec<usize> = candidates.iter().map(|c| c.frame_number).collect();
        let frames = self
            .sampler
            .get_frames_with(path, &indices, self.config.frame_access, |_| {
                self.check_cancelled()
            })
            .map_err(|e| candidate_fetch_error(path, e))?;

        let scenes = self.deduplicate(&candidates, frames)?;
        log::info!(
            "Kept {} of {} candidate scenes for {}",
            scenes.len(),
            candidates.len(),
            path.display()
        );
        Ok(scenes)
    }

    /// Keeps the first candidate, then each later one that is not a
    /// near-duplicate of any scene kept before it.
    fn deduplicate(
        &self,
        candidates: &[CandidateScene],
        frames: Vec<Frame>,
    ) -> CoreResult<Vec<SceneRecord>> {
        let threshold = self.config.similarity_threshold;
        let mut kept: Vec<SceneRecord> = Vec::with_capacity(candidates.len());

        for (candidate, frame) in candidates.iter().zip(frames) {
            let mut duplicate_of = None;
            for scene in &kept {
                let score = self.scorer.similarity(&scene.frame_image, &frame)?;
                if score > threshold {
                    duplicate_of = Some((scene.frame_number, score));
                    break;
                }
            }

            match duplicate_of {
                Some((kept_frame, score)) => log::debug!(
                    "Dropping frame {}: similarity {:.3} to kept frame {} exceeds {}",
                    candidate.frame_number,
                    score,
                    kept_frame,
                    threshold
                ),
                None => {
                    log::debug!(
                        "Keeping frame {} (prominence {:.3})",
                        candidate.frame_number,
                        candidate.prominence
                    );
                    kept.push(SceneRecord::from_candidate(candidate, frame));
                }
            }
        }
        Ok(kept)
    }

    fn check_cancelled(&self) -> CoreResult<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => {
                log::info!("Scene detection cancelled");
                Err(CoreError::Cancelled)
            }
            _ => Ok(()),
        }
    }
}

/// A candidate past the last frame means the signal and the video disagree,
/// which is reported like any other unreadable candidate.
fn candidate_fetch_error(path: &Path, err: CoreError) -> CoreError {
    match err {
        CoreError::FrameIndexOutOfRange {
            index, frame_count, ..
        } => frame_read_error(
            path,
            index,
            format!("candidate beyond the video's {frame_count} frames"),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneDetectionConfigBuilder;
    use crate::external::mocks::MockVideoSource;

    fn detector(sigma: f64) -> SceneChangeDetector<MockVideoSource> {
        let config = SceneDetectionConfigBuilder::new().sigma(sigma).build().unwrap();
        SceneChangeDetector::new(config, MockVideoSource::new()).unwrap()
    }

    #[test]
    fn test_candidates_carry_sample_frame_numbers() {
        // Samples start at frame 100 with a single strong spike at frame 110
        let mut values = vec![0.0; 21];
        values[10] = 20.0;
        let samples: Vec<ChangeSample> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| ChangeSample::new(100 + i, 25.0, v))
            .collect();

        let candidates = detector(1.0).detect_candidates(&samples).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].frame_number, 110);
        assert_eq!(candidates[0].content_val, 20.0);
        assert!(candidates[0].smoothed_content_val < 20.0);
    }

    #[test]
    fn test_constant_signal_has_no_candidates() {
        let samples = ChangeSample::series(&[5.0; 30], 25.0);
        assert!(detector(3.0).detect_candidates(&samples).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let mut config = SceneDetectionConfigBuilder::new().build().unwrap();
        config.sigma = -1.0;
        let result = SceneChangeDetector::new(config, MockVideoSource::new());
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}

//! Configuration structures and constants for the scenecut-core library.
//!
//! This module provides the tunable parameters of scene detection: signal
//! smoothing, peak thresholds, similarity-based deduplication and VFR seek
//! behaviour. Defaults can be overridden through `SCENECUT_*` environment
//! variables, a JSON file, or the builder.

mod builder;
mod utils;

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use builder::SceneDetectionConfigBuilder;
use utils::{get_env_f64, get_env_optional_usize, get_env_usize};

// Default constants

/// Default standard deviation of the Gaussian smoothing kernel, in samples.
/// The kernel spans roughly 6*sigma+1 samples.
pub const DEFAULT_SIGMA: f64 = 3.0;

/// Default minimum smoothed change value a peak must reach.
pub const DEFAULT_MIN_HEIGHT: f64 = 4.0;

/// Default minimum topographic prominence of a peak.
pub const DEFAULT_MIN_PROMINENCE: f64 = 3.0;

/// Default composite similarity above which a later candidate is treated as
/// a near-duplicate of a kept scene.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.55;

/// Default weight of the hue/saturation histogram score in the composite similarity.
pub const DEFAULT_HISTOGRAM_WEIGHT: f64 = 0.5;

/// Default side length of the structural similarity window, in pixels.
pub const DEFAULT_SIMILARITY_WINDOW_SIZE: usize = 7;

/// Default number of frames to back off when a seek overshoots its target.
pub const DEFAULT_VFR_SAFETY_MARGIN: usize = 100;

/// How candidate frames are fetched from the video during deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameAccess {
    /// Every frame is fetched through its own VFR-safe `get_frame` call.
    #[default]
    Independent,

    /// One reader handle serves all candidates. Requires strictly increasing
    /// frame indices; short gaps are walked forward, long gaps use the same
    /// VFR-safe seek as `Independent`.
    ForwardWalk,
}

/// Scene detection configuration.
///
/// # Examples
///
/// ```rust
/// use scenecut_core::config::SceneDetectionConfigBuilder;
///
/// let config = SceneDetectionConfigBuilder::new()
///     .sigma(2.0)
///     .min_prominence(2.5)
///     .max_scenes(12)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_scenes, Some(12));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDetectionConfig {
    //
    // Signal analysis
    //

    /// Standard deviation of the Gaussian smoothing kernel (must be > 0)
    pub sigma: f64,

    /// Minimum smoothed value a peak must reach
    pub min_height: f64,

    /// Minimum topographic prominence of a peak
    pub min_prominence: f64,

    //
    // Deduplication
    //

    /// Candidates more similar than this to any kept scene are dropped
    pub similarity_threshold: f64,

    /// Weight of the histogram score in the composite similarity (0..=1)
    pub histogram_weight: f64,

    /// Structural similarity window size (odd)
    pub similarity_window_size: usize,

    //
    // Frame access
    //

    /// Frames to back off when a seek lands past its target
    pub vfr_safety_margin: usize,

    /// Frame fetch strategy during deduplication
    pub frame_access: FrameAccess,

    //
    // Result size
    //

    /// Keep only the most prominent N scenes
    pub max_scenes: Option<usize>,
}

impl Default for SceneDetectionConfig {
    fn default() -> Self {
        Self {
            // Higher sigma merges nearby spikes into one broad peak
            sigma: get_env_f64("SCENECUT_SIGMA", DEFAULT_SIGMA),

            // How visually different two regions must be to count as a change
            min_height: get_env_f64("SCENECUT_MIN_HEIGHT", DEFAULT_MIN_HEIGHT),
            min_prominence: get_env_f64("SCENECUT_MIN_PROMINENCE", DEFAULT_MIN_PROMINENCE),

            similarity_threshold: get_env_f64(
                "SCENECUT_SIMILARITY_THRESHOLD",
                DEFAULT_SIMILARITY_THRESHOLD,
            ),
            histogram_weight: get_env_f64("SCENECUT_HISTOGRAM_WEIGHT", DEFAULT_HISTOGRAM_WEIGHT),
            similarity_window_size: get_env_usize(
                "SCENECUT_SIMILARITY_WINDOW_SIZE",
                DEFAULT_SIMILARITY_WINDOW_SIZE,
            ),

            vfr_safety_margin: get_env_usize("SCENECUT_VFR_SAFETY_MARGIN", DEFAULT_VFR_SAFETY_MARGIN),
            frame_access: FrameAccess::default(),

            max_scenes: get_env_optional_usize("SCENECUT_MAX_SCENES"),
        }
    }
}

impl SceneDetectionConfig {
    /// Loads a configuration from a JSON file. Missing fields take their
    /// defaults; the result is validated before it is returned.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CoreError::JsonParse(format!("config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        log::debug!("Loaded scene detection config from {}", path.display());
        Ok(config)
    }

    /// Checks every parameter, returning a `Config` error for the first invalid one.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(CoreError::Config(format!(
                "sigma must be a positive number, got {}",
                self.sigma
            )));
        }
        check_non_negative("min_height", self.min_height)?;
        check_non_negative("min_prominence", self.min_prominence)?;
        check_non_negative("similarity_threshold", self.similarity_threshold)?;

        if !(0.0..=1.0).contains(&self.histogram_weight) {
            return Err(CoreError::Config(format!(
                "histogram_weight must be within 0..=1, got {}",
                self.histogram_weight
            )));
        }
        if self.similarity_window_size == 0 || self.similarity_window_size % 2 == 0 {
            return Err(CoreError::Config(format!(
                "similarity_window_size must be a positive odd number, got {}",
                self.similarity_window_size
            )));
        }
        if self.max_scenes == Some(0) {
            return Err(CoreError::Config(
                "max_scenes must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_non_negative(name: &str, value: f64) -> CoreResult<()> {
    if value.is_nan() || value < 0.0 {
        return Err(CoreError::Config(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_defaults() -> SceneDetectionConfig {
        SceneDetectionConfig {
            sigma: DEFAULT_SIGMA,
            min_height: DEFAULT_MIN_HEIGHT,
            min_prominence: DEFAULT_MIN_PROMINENCE,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            histogram_weight: DEFAULT_HISTOGRAM_WEIGHT,
            similarity_window_size: DEFAULT_SIMILARITY_WINDOW_SIZE,
            vfr_safety_margin: DEFAULT_VFR_SAFETY_MARGIN,
            frame_access: FrameAccess::Independent,
            max_scenes: None,
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(plain_defaults().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        for sigma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SceneDetectionConfig { sigma, ..plain_defaults() };
            assert!(matches!(config.validate(), Err(CoreError::Config(_))), "sigma {sigma}");
        }
    }

    #[test]
    fn test_rejects_negative_thresholds() {
        let config = SceneDetectionConfig { min_height: -0.1, ..plain_defaults() };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let config = SceneDetectionConfig { min_prominence: -3.0, ..plain_defaults() };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let config = SceneDetectionConfig { similarity_threshold: -0.5, ..plain_defaults() };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_rejects_even_or_zero_window() {
        for size in [0, 2, 8] {
            let config = SceneDetectionConfig { similarity_window_size: size, ..plain_defaults() };
            assert!(matches!(config.validate(), Err(CoreError::Config(_))), "window {size}");
        }
        let config = SceneDetectionConfig { similarity_window_size: 1, ..plain_defaults() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_histogram_weight_outside_unit_interval() {
        let config = SceneDetectionConfig { histogram_weight: 1.5, ..plain_defaults() };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_max_scenes() {
        let config = SceneDetectionConfig { max_scenes: Some(0), ..plain_defaults() };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_frame_access_serializes_snake_case() {
        let json = serde_json::to_string(&FrameAccess::ForwardWalk).unwrap();
        assert_eq!(json, "\"forward_walk\"");
    }
}

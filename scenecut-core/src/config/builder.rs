// ============================================================================
// scenecut-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for SceneDetectionConfig
//
// This module implements the builder pattern for SceneDetectionConfig,
// providing a fluent API that starts from the defaults (including any
// SCENECUT_* environment overrides) and validates eagerly in build().
//
// AI-ASSISTANT-INFO: Builder pattern implementation for SceneDetectionConfig

// ---- Internal crate imports ----
use super::{FrameAccess, SceneDetectionConfig};
use crate::error::CoreResult;

/// Builder for creating SceneDetectionConfig instances.
///
/// # Examples
///
/// ```rust
/// use scenecut_core::config::{FrameAccess, SceneDetectionConfigBuilder};
///
/// let config = SceneDetectionConfigBuilder::new()
///     .sigma(3.0)
///     .min_height(4.0)
///     .min_prominence(3.0)
///     .similarity_threshold(0.55)
///     .frame_access(FrameAccess::ForwardWalk)
///     .build()
///     .unwrap();
/// assert_eq!(config.frame_access, FrameAccess::ForwardWalk);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SceneDetectionConfigBuilder {
    config: SceneDetectionConfig,
}

impl SceneDetectionConfigBuilder {
    /// Creates a new builder seeded with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: SceneDetectionConfig) -> Self {
        Self { config }
    }

    /// Sets the Gaussian smoothing sigma.
    ///
    /// # Arguments
    ///
    /// * `sigma` - Standard deviation of the kernel in samples (must be > 0)
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.config.sigma = sigma;
        self
    }

    /// Sets the minimum smoothed peak height.
    pub fn min_height(mut self, min_height: f64) -> Self {
        self.config.min_height = min_height;
        self
    }

    /// Sets the minimum peak prominence.
    pub fn min_prominence(mut self, min_prominence: f64) -> Self {
        self.config.min_prominence = min_prominence;
        self
    }

    /// Sets the near-duplicate similarity threshold.
    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Sets the histogram weight of the composite similarity.
    pub fn histogram_weight(mut self, weight: f64) -> Self {
        self.config.histogram_weight = weight;
        self
    }

    /// Sets the structural similarity window size (odd).
    pub fn similarity_window_size(mut self, size: usize) -> Self {
        self.config.similarity_window_size = size;
        self
    }

    /// Sets how far to back off after an overshooting seek.
    pub fn vfr_safety_margin(mut self, frames: usize) -> Self {
        self.config.vfr_safety_margin = frames;
        self
    }

    /// Sets the frame fetch strategy used during deduplication.
    pub fn frame_access(mut self, access: FrameAccess) -> Self {
        self.config.frame_access = access;
        self
    }

    /// Caps the result to the N most prominent scenes.
    pub fn max_scenes(mut self, max_scenes: usize) -> Self {
        self.config.max_scenes = Some(max_scenes);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(SceneDetectionConfig)` - When all parameters are valid
    /// * `Err(CoreError::Config)` - Naming the first invalid parameter
    pub fn build(self) -> CoreResult<SceneDetectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

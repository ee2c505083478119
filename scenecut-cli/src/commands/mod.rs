//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command. Shared
//! setup (configuration layering, input discovery, run summaries) lives here.

/// Module containing the implementation of the `analyze` command.
pub mod analyze;

/// Module containing the implementation of the `stats` command.
pub mod stats;

use crate::cli::DetectionArgs;
use crate::error::{CliResult, validate_input_path};

use scenecut_core::config::{FrameAccess, SceneDetectionConfig, SceneDetectionConfigBuilder};
use scenecut_core::{check_ffmpeg_tools, find_video_files};

use std::path::{Path, PathBuf};

/// Outcome of a multi-video command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Layers the detection settings: SCENECUT_* defaults, then the config file,
/// then explicit command-line values.
pub fn detection_config(
    args: &DetectionArgs,
    max_scenes: Option<usize>,
) -> CliResult<SceneDetectionConfig> {
    let base = match &args.config {
        Some(path) => SceneDetectionConfig::from_json_file(path)?,
        None => SceneDetectionConfig::default(),
    };

    let mut builder = SceneDetectionConfigBuilder::from_config(base);
    if let Some(sigma) = args.sigma {
        builder = builder.sigma(sigma);
    }
    if let Some(min_height) = args.min_height {
        builder = builder.min_height(min_height);
    }
    if let Some(min_prominence) = args.min_prominence {
        builder = builder.min_prominence(min_prominence);
    }
    if let Some(threshold) = args.similarity_threshold {
        builder = builder.similarity_threshold(threshold);
    }
    if let Some(weight) = args.histogram_weight {
        builder = builder.histogram_weight(weight);
    }
    if let Some(size) = args.window_size {
        builder = builder.similarity_window_size(size);
    }
    if args.forward_walk {
        builder = builder.frame_access(FrameAccess::ForwardWalk);
    }
    if let Some(max_scenes) = max_scenes {
        builder = builder.max_scenes(max_scenes);
    }
    builder.build()
}

/// Validates the input, checks for ffmpeg/ffprobe and lists the videos to process.
pub fn prepare_inputs(input: &Path, recursive: bool) -> CliResult<Vec<PathBuf>> {
    validate_input_path(input)?;
    check_ffmpeg_tools()?;
    let files = find_video_files(input, recursive)?;
    log::info!("Found {} video file(s) under {}", files.len(), input.display());
    Ok(files)
}

//! Core library for detecting scene changes in video.
//!
//! This crate turns a per-frame visual-change signal into a short list of
//! visually distinct scene boundaries, each with its decoded frame. The signal
//! is smoothed, its prominent peaks become candidates, candidate frames are
//! fetched with VFR-safe seeking, and near-duplicates of earlier scenes are
//! dropped by a composite structural/colour similarity score.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use scenecut_core::{
//!     FfmpegVideoSource, MovieAnalyzer, ScdetChangeSignal, SceneDetectionConfigBuilder,
//! };
//! use std::path::Path;
//!
//! let config = SceneDetectionConfigBuilder::new().max_scenes(20).build().unwrap();
//! let analyzer = MovieAnalyzer::new(
//!     config,
//!     ScdetChangeSignal::new(),
//!     FfmpegVideoSource::new(),
//! )
//! .unwrap();
//!
//! let analysis = analyzer.analyze(Path::new("/path/to/movie.mkv")).unwrap();
//! for scene in &analysis.scenes {
//!     println!("frame {} (prominence {:.2})", scene.frame_number, scene.prominence);
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod media;
pub mod processing;
pub mod utils;

// Re-exports for public API
pub use config::{FrameAccess, SceneDetectionConfig, SceneDetectionConfigBuilder};
pub use discovery::{VideoFilter, find_video_files};
pub use error::{CoreError, CoreResult};
pub use external::{VideoProperties, check_ffmpeg_tools, get_video_properties};
pub use media::{FfmpegVideoSource, Frame, VideoReader, VideoSource};
pub use processing::{
    CandidateScene, ChangeSample, ChangeSignalSource, FrameSampler, MovieAnalysis, MovieAnalyzer,
    ProminenceCalibration, ScdetChangeSignal, SceneChangeDetector, SceneRecord, SignalStatistics,
    SimilarityScorer, cap_by_prominence,
};
pub use utils::{format_bytes, format_duration, format_timecode};

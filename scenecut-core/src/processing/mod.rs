//! Scene detection pipeline.
//!
//! This module organizes the stages of scene detection into submodules and
//! exposes the types and entry points callers need. Data flows one way:
//! change samples are smoothed, peaks become candidate scenes, candidate
//! frames are fetched and deduplicated, and the surviving scenes are
//! optionally capped by prominence.

/// Data types shared by the pipeline stages
pub mod types;

/// Gaussian smoothing of the change signal
pub mod smoothing;

/// Peak finding with height and prominence filters
pub mod peaks;

/// Composite frame similarity
pub mod similarity;

/// VFR-safe frame retrieval
pub mod frame_sampler;

/// Change-signal collaborator (ffmpeg scdet)
pub mod change_signal;

/// Scene detection and deduplication
pub mod scene_detector;

/// Whole-video driver, statistics and batch analysis
pub mod movie_analyzer;

pub use change_signal::{ChangeSignalSource, ScdetChangeSignal};
pub use frame_sampler::{ForwardWalker, FrameSampler};
pub use movie_analyzer::{
    MovieAnalysis, MovieAnalyzer, ProminenceCalibration, SignalStatistics, cap_by_prominence,
};
pub use peaks::{Peak, find_peaks};
pub use scene_detector::SceneChangeDetector;
pub use similarity::SimilarityScorer;
pub use smoothing::smooth;
pub use types::{CandidateScene, ChangeSample, SceneRecord};

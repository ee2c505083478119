// ============================================================================
// scenecut-cli/src/cli.rs
// ============================================================================
//
// COMMAND-LINE INTERFACE: Argument Definitions
//
// Defines the clap argument structures for the scenecut binary. Detection
// parameters are shared by both subcommands through DetectionArgs; any value
// given here overrides the config file and SCENECUT_* environment defaults.
//
// AI-ASSISTANT-INFO: clap argument definitions for the scenecut CLI

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Scenecut: Scene change detection for video",
    long_about = "Finds visually distinct scene boundaries in video files using ffmpeg via scenecut-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging. RUST_LOG takes precedence when set.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detects scene boundaries and prints the scene list of each video
    Analyze(AnalyzeArgs),

    /// Prints change-signal statistics and optionally calibrates min_prominence
    Stats(StatsArgs),
}

/// Detection parameters shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct DetectionArgs {
    /// JSON file with scene detection settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Standard deviation of the Gaussian smoothing kernel, in frames
    #[arg(long, value_name = "SIGMA")]
    pub sigma: Option<f64>,

    /// Minimum smoothed change value of a scene peak
    #[arg(long, value_name = "VALUE")]
    pub min_height: Option<f64>,

    /// Minimum prominence of a scene peak
    #[arg(long, value_name = "VALUE")]
    pub min_prominence: Option<f64>,

    /// Composite similarity above which a later scene is a near-duplicate
    #[arg(long, value_name = "SCORE")]
    pub similarity_threshold: Option<f64>,

    /// Weight of the colour histogram in the similarity score (0-1)
    #[arg(long, value_name = "WEIGHT")]
    pub histogram_weight: Option<f64>,

    /// Structural similarity window size in pixels (odd)
    #[arg(long, value_name = "PIXELS")]
    pub window_size: Option<usize>,

    /// Fetch candidate frames with one reader walking forward
    #[arg(long)]
    pub forward_walk: bool,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Input video file or directory of videos
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Search subdirectories of INPUT as well
    #[arg(short, long)]
    pub recursive: bool,

    /// Keep only the N most prominent scenes of each video
    #[arg(long, value_name = "N")]
    pub max_scenes: Option<usize>,

    /// Skip videos larger than this many MB
    #[arg(long, value_name = "MB")]
    pub max_size_mb: Option<f64>,

    /// Skip videos longer than this many minutes
    #[arg(long, value_name = "MINUTES")]
    pub max_duration_min: Option<f64>,

    #[command(flatten)]
    pub detection: DetectionArgs,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Input video file or directory of videos
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Search subdirectories of INPUT as well
    #[arg(short, long)]
    pub recursive: bool,

    /// Find the min_prominence that yields about N scene candidates
    #[arg(long, value_name = "N")]
    pub target_scenes: Option<usize>,

    #[command(flatten)]
    pub detection: DetectionArgs,
}

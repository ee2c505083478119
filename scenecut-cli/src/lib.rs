// scenecut-cli/src/lib.rs
//
// Library portion of the Scenecut CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{AnalyzeArgs, Cli, Commands, DetectionArgs, StatsArgs};
pub use commands::RunSummary;
pub use commands::analyze::run_analyze;
pub use commands::stats::run_stats;

// ============================================================================
// scenecut-cli/src/main.rs
// ============================================================================
//
// SCENECUT CLI: Entry Point
//
// Parses the command line, initialises logging and dispatches to the
// subcommand implementations in scenecut_cli::commands.
//
// Exit codes:
// - 0: every video was processed
// - 1: a setup error occurred, or at least one video failed
//
// AI-ASSISTANT-INFO: Main entry point for the scenecut binary

use clap::Parser;
use owo_colors::OwoColorize;
use scenecut_cli::logging::{init_logging, should_use_color};
use scenecut_cli::{Cli, Commands, run_analyze, run_stats};
use std::process;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Stats(args) => run_stats(args),
    };

    match result {
        Ok(summary) if summary.has_failures() => {
            log::error!("{} video(s) failed", summary.failed);
            process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            if should_use_color() {
                eprintln!("{} {}", "Error:".red().bold(), e);
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

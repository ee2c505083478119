//! Implementation of the 'stats' subcommand.
//!
//! Collects the change signal of each video and prints its summary. With
//! `--target-scenes`, also searches for the min_prominence that produces about
//! that many scene candidates, which is a quick way to tune a config for a
//! collection of similar videos.

use super::{RunSummary, detection_config, prepare_inputs};
use crate::cli::StatsArgs;
use crate::error::CliResult;
use crate::logging::should_use_color;

use scenecut_core::{
    ChangeSignalSource, CoreResult, FfmpegVideoSource, MovieAnalyzer, ScdetChangeSignal,
    SignalStatistics,
};

use log::{error, info};
use owo_colors::OwoColorize;

use std::path::Path;

/// Prints signal statistics for every video found at `args.input`.
pub fn run_stats(args: StatsArgs) -> CliResult<RunSummary> {
    let files = prepare_inputs(&args.input, args.recursive)?;
    let config = detection_config(&args.detection, None)?;

    let analyzer = MovieAnalyzer::new(config, ScdetChangeSignal::new(), FfmpegVideoSource::new())?;

    let mut summary = RunSummary::default();
    for file in &files {
        match report_file(&analyzer, file, args.target_scenes) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                error!("Failed to collect statistics for {}: {}", file.display(), e);
                summary.failed += 1;
            }
        }
    }
    info!(
        "Collected statistics for {} video(s), {} failed",
        summary.succeeded, summary.failed
    );
    Ok(summary)
}

fn report_file(
    analyzer: &MovieAnalyzer<ScdetChangeSignal, FfmpegVideoSource>,
    path: &Path,
    target_scenes: Option<usize>,
) -> CoreResult<()> {
    let samples = analyzer.signal().change_samples(path)?;
    let stats = SignalStatistics::from_samples(&samples);

    println!();
    let name = path.display().to_string();
    if should_use_color() {
        println!("{}", name.bold());
    } else {
        println!("{name}");
    }
    print_statistics(&stats);

    if let Some(target) = target_scenes {
        let calibration = analyzer.min_prominence_for_scene_count(&samples, target)?;
        println!(
            "  min_prominence {:.3} gives {} candidate(s) (target {})",
            calibration.min_prominence, calibration.candidate_count, target
        );
    }
    Ok(())
}

fn print_statistics(stats: &SignalStatistics) {
    println!("  samples  {}", stats.count);
    println!("  mean     {:.3}", stats.mean);
    println!("  median   {:.3}", stats.median);
    println!("  std dev  {:.3}", stats.std_dev);
    println!("  min      {:.3}", stats.min);
    println!("  max      {:.3}", stats.max);
}

//! Implementation of the 'analyze' subcommand.
//!
//! This module discovers videos, applies the size/duration filter, runs the
//! scene detection for all remaining videos in parallel and prints one scene
//! table per video.

use super::{RunSummary, detection_config, prepare_inputs};
use crate::cli::AnalyzeArgs;
use crate::error::CliResult;
use crate::logging::{get_timestamp, should_use_color};

use scenecut_core::{
    FfmpegVideoSource, MovieAnalysis, MovieAnalyzer, ScdetChangeSignal, VideoFilter, format_bytes,
    format_duration, format_timecode,
};

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use owo_colors::OwoColorize;

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Runs scene detection over every video found at `args.input`.
///
/// # Returns
///
/// * `Ok(RunSummary)` - Per-video failures are counted, not returned
/// * `Err(CoreError)` - If the input, configuration or tools are unusable
pub fn run_analyze(args: AnalyzeArgs) -> CliResult<RunSummary> {
    let total_start_time = Instant::now();
    let files = prepare_inputs(&args.input, args.recursive)?;
    let config = detection_config(&args.detection, args.max_scenes)?;

    let filter = VideoFilter {
        max_size_mb: args.max_size_mb,
        max_duration_min: args.max_duration_min,
    };
    let mut summary = RunSummary::default();
    let to_analyze = filter_inputs(&filter, files, &mut summary);
    if to_analyze.is_empty() {
        warn!("No videos left to analyse after filtering");
        return Ok(summary);
    }

    info!("Scenecut run started: {}", get_timestamp());
    let analyzer = MovieAnalyzer::new(config, ScdetChangeSignal::new(), FfmpegVideoSource::new())?;

    let spinner = start_spinner(&format!("Analysing {} video(s)", to_analyze.len()));
    let results = analyzer.analyze_batch(&to_analyze);
    spinner.finish_and_clear();

    for (path, result) in &results {
        match result {
            Ok(analysis) => {
                print_analysis(analysis);
                summary.succeeded += 1;
            }
            Err(e) => {
                error!("Failed to analyse {}: {}", path.display(), e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Analysed {} video(s), {} failed, {} skipped in {}",
        summary.succeeded,
        summary.failed,
        summary.skipped,
        format_duration(total_start_time.elapsed().as_secs_f64())
    );
    info!("Scenecut run finished: {}", get_timestamp());
    Ok(summary)
}

/// Drops files over the filter limits. A file that cannot be inspected is
/// counted as failed and the rest of the batch goes on.
fn filter_inputs(filter: &VideoFilter, files: Vec<PathBuf>, summary: &mut RunSummary) -> Vec<PathBuf> {
    let mut kept = Vec::with_capacity(files.len());
    for file in files {
        match filter.skip_reason(&file) {
            Ok(Some(reason)) => {
                warn!("Skipping {}: {}", file.display(), reason);
                summary.skipped += 1;
            }
            Ok(None) => kept.push(file),
            Err(e) => {
                error!("Failed to inspect {}: {}", file.display(), e);
                summary.failed += 1;
            }
        }
    }
    kept
}

fn start_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Prints the scene table of one video to stdout.
fn print_analysis(analysis: &MovieAnalysis) {
    let name = analysis
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| analysis.path.display().to_string());
    let size = std::fs::metadata(&analysis.path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown size".to_string());
    let heading = format!(
        "{} ({}, {} samples, {} scenes)",
        name,
        size,
        analysis.samples.len(),
        analysis.scenes.len()
    );

    println!();
    if should_use_color() {
        println!("{}", heading.bold());
    } else {
        println!("{heading}");
    }
    println!(
        "  {:>3}  {:>8}  {:<12}  {:>10}  {:>8}",
        "#", "frame", "timecode", "prominence", "change"
    );

    for (i, scene) in analysis.scenes.iter().enumerate() {
        let timecode = analysis
            .samples
            .binary_search_by_key(&scene.frame_number, |s| s.frame_number)
            .map(|idx| format_timecode(analysis.samples[idx].timecode))
            .unwrap_or_else(|_| format_timecode(f64::NAN));
        let frame = format!("{:>8}", scene.frame_number);
        println!(
            "  {:>3}  {}  {:<12}  {:>10.2}  {:>8.2}",
            i + 1,
            if should_use_color() { frame.cyan().to_string() } else { frame },
            timecode,
            scene.prominence,
            scene.content_val
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_vanished_file_counts_as_failed_and_batch_continues() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let small = dir.path().join("small.mkv");
        File::create(&small)?;
        let big = dir.path().join("big.mkv");
        File::create(&big)?.set_len(3 * 1024 * 1024)?;
        let gone = dir.path().join("gone.mkv");

        let filter = VideoFilter {
            max_size_mb: Some(1.0),
            max_duration_min: None,
        };
        let mut summary = RunSummary::default();
        let kept = filter_inputs(&filter, vec![small.clone(), gone, big], &mut summary);

        assert_eq!(kept, vec![small]);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.has_failures());
        Ok(())
    }
}

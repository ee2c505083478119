//! File discovery module for finding video files to analyse.
//!
//! This module finds video files by extension (case-insensitive), either in
//! the top level of a directory or recursively, and decides which of them to
//! skip because they exceed a size or duration limit.

use crate::error::{CoreError, CoreResult};
use crate::external::get_video_properties;

use std::path::{Path, PathBuf};

/// Extensions recognised as video files.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v", "wmv", "flv", "ts"];

/// Checks if the given path has a supported video extension.
#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Finds video files at `input`.
///
/// A file path is returned as-is when it has a supported extension. For a
/// directory, only its top level is searched unless `recursive` is set.
///
/// # Arguments
///
/// * `input` - A video file or a directory
/// * `recursive` - Whether to descend into subdirectories
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Sorted paths of the discovered videos
/// * `Err(CoreError::Io)` - If a directory cannot be read
/// * `Err(CoreError::NoFilesFound)` - If no video files are found
///
/// # Examples
///
/// ```rust,no_run
/// use scenecut_core::find_video_files;
/// use std::path::Path;
///
/// match find_video_files(Path::new("/path/to/videos"), true) {
///     Ok(files) => println!("Found {} video files", files.len()),
///     Err(e) => println!("Error finding video files: {}", e),
/// }
/// ```
pub fn find_video_files(input: &Path, recursive: bool) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    if input.is_file() {
        if is_video_file(input) {
            files.push(input.to_path_buf());
        }
    } else {
        collect_dir(input, recursive, &mut files)?;
        files.sort();
    }

    if files.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        log::debug!("Found {} video files under {}", files.len(), input.display());
        Ok(files)
    }
}

fn collect_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_dir(&path, recursive, files)?;
            }
        } else if path.is_file() && is_video_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Limits used to skip videos before analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VideoFilter {
    /// Skip files larger than this many MiB
    pub max_size_mb: Option<f64>,
    /// Skip videos longer than this many minutes
    pub max_duration_min: Option<f64>,
}

impl VideoFilter {
    /// Returns why `path` should be skipped, or `None` to analyse it.
    ///
    /// The duration is only probed when a duration limit is set; a video
    /// whose duration cannot be determined is skipped.
    pub fn skip_reason(&self, path: &Path) -> CoreResult<Option<String>> {
        let size_bytes = std::fs::metadata(path)?.len();
        let duration_secs = match self.max_duration_min {
            Some(_) => get_video_properties(path)
                .ok()
                .map(|props| props.duration_secs)
                .filter(|d| *d > 0.0),
            None => None,
        };
        Ok(self.evaluate(size_bytes, duration_secs))
    }

    /// Applies the limits to already known file facts.
    pub fn evaluate(&self, size_bytes: u64, duration_secs: Option<f64>) -> Option<String> {
        if let Some(limit) = self.max_size_mb {
            let size_mb = size_bytes as f64 / (1024.0 * 1024.0);
            if size_mb > limit {
                return Some(format!("size {size_mb:.2}MB exceeds limit {limit}MB"));
            }
        }
        if let Some(limit) = self.max_duration_min {
            let Some(seconds) = duration_secs else {
                return Some("duration could not be determined".to_string());
            };
            let minutes = seconds / 60.0;
            if minutes > limit {
                return Some(format!("duration {minutes:.2}min exceeds limit {limit}min"));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("a.mkv")));
        assert!(is_video_file(Path::new("b.MP4")));
        assert!(is_video_file(Path::new("dir/c.ts")));
        assert!(!is_video_file(Path::new("d.txt")));
        assert!(!is_video_file(Path::new("mkv")));
    }

    #[test]
    fn test_filter_size_limit() {
        let filter = VideoFilter {
            max_size_mb: Some(1.0),
            max_duration_min: None,
        };
        assert_eq!(filter.evaluate(512 * 1024, None), None);
        assert!(filter.evaluate(2 * 1024 * 1024, None).unwrap().contains("size"));
    }

    #[test]
    fn test_filter_duration_limit() {
        let filter = VideoFilter {
            max_size_mb: None,
            max_duration_min: Some(10.0),
        };
        assert_eq!(filter.evaluate(0, Some(300.0)), None);
        assert!(filter.evaluate(0, Some(900.0)).unwrap().contains("duration"));
        assert!(filter.evaluate(0, None).is_some());
    }
}

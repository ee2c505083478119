//! FFprobe integration for video stream properties
//!
//! This module runs ffprobe (through the `ffprobe` crate) to find the frame
//! geometry, frame rate, frame count and start time of a video's first video
//! stream. The frame reader needs all of them to map frame indices to seek
//! timestamps and back.
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Properties of the first video stream of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    /// Average frames per second
    pub frame_rate: f64,
    /// Number of decodable frames
    pub frame_count: usize,
    pub duration_secs: f64,
    /// Presentation time of the first frame, in seconds
    pub start_time: f64,
}

/// Gets video properties for a given input file.
pub fn get_video_properties(input_path: &Path) -> CoreResult<VideoProperties> {
    log::debug!(
        "Running ffprobe (via crate) for video properties on: {}",
        input_path.display()
    );
    let metadata = ffprobe(input_path).map_err(|err| {
        log::error!(
            "ffprobe failed for video properties on {}: {:?}",
            input_path.display(),
            err
        );
        map_ffprobe_error(err, "video properties")
    })?;

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CoreError::VideoInfo(format!("No video stream found in {}", input_path.display()))
        })?;

    let (width, height) = match (video_stream.width, video_stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w as u32, h as u32),
        (w, h) => {
            return Err(CoreError::VideoInfo(format!(
                "Invalid dimensions in {}: width={:?}, height={:?}",
                input_path.display(),
                w,
                h
            )));
        }
    };

    let frame_rate = parse_frame_rate(&video_stream.avg_frame_rate)
        .or_else(|| parse_frame_rate(&video_stream.r_frame_rate))
        .ok_or_else(|| {
            CoreError::FfprobeParse(format!(
                "No usable frame rate for {} (avg={}, r={})",
                input_path.display(),
                video_stream.avg_frame_rate,
                video_stream.r_frame_rate
            ))
        })?;

    let duration_secs = parse_seconds(video_stream.duration.as_deref())
        .or_else(|| parse_seconds(metadata.format.duration.as_deref()))
        .unwrap_or(0.0);
    let start_time = parse_seconds(video_stream.start_time.as_deref())
        .or_else(|| parse_seconds(metadata.format.start_time.as_deref()))
        .unwrap_or(0.0);

    if video_stream.nb_frames.is_none() {
        log::warn!(
            "{} does not report nb_frames, estimating frame count from duration",
            input_path.display()
        );
    }
    let frame_count = frame_count_from(video_stream.nb_frames.as_deref(), duration_secs, frame_rate)
        .ok_or_else(|| {
            CoreError::FfprobeParse(format!(
                "Could not determine frame count for {}",
                input_path.display()
            ))
        })?;

    let properties = VideoProperties {
        width,
        height,
        frame_rate,
        frame_count,
        duration_secs,
        start_time,
    };
    log::debug!("Video properties for {}: {:?}", input_path.display(), properties);
    Ok(properties)
}

/// Parses an ffprobe rational such as `30000/1001` or a plain number.
/// Zero and malformed rates yield `None`.
pub fn parse_frame_rate(value: &str) -> Option<f64> {
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Frame count from `nb_frames`, falling back to `duration * frame_rate`.
fn frame_count_from(nb_frames: Option<&str>, duration_secs: f64, frame_rate: f64) -> Option<usize> {
    if let Some(count) = nb_frames.and_then(|n| n.trim().parse::<usize>().ok()) {
        if count > 0 {
            return Some(count);
        }
    }
    let estimate = (duration_secs * frame_rate).round();
    (estimate >= 1.0).then_some(estimate as usize)
}

fn parse_seconds(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::JsonParse(format!("ffprobe {context} output deserialization: {err}"))
        }
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.001);
        assert_eq!(parse_frame_rate("24"), Some(24.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("0/1"), None);
        assert_eq!(parse_frame_rate("n/a"), None);
    }

    #[test]
    fn test_frame_count_prefers_nb_frames() {
        assert_eq!(frame_count_from(Some("1440"), 60.0, 25.0), Some(1440));
    }

    #[test]
    fn test_frame_count_falls_back_to_duration() {
        assert_eq!(frame_count_from(None, 10.0, 25.0), Some(250));
        assert_eq!(frame_count_from(Some("0"), 2.0, 30.0), Some(60));
        assert_eq!(frame_count_from(None, 0.0, 25.0), None);
    }
}

//! Type definitions shared by the scene detection pipeline.
//!
//! Data flows one way through these types: `ChangeSample` rows are smoothed
//! and searched for peaks to produce `CandidateScene` rows, and candidates
//! that survive deduplication become `SceneRecord`s carrying their frame image.

use crate::error::{CoreError, CoreResult};
use crate::media::Frame;
use serde::{Deserialize, Serialize};

/// One analysed frame of the change signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeSample {
    /// 0-based frame number, strictly increasing within a series
    pub frame_number: usize,
    /// Seconds from the start of the video (frame_number / frame_rate)
    pub timecode: f64,
    /// Raw visual-change magnitude (non-negative)
    pub content_val: f64,
}

impl ChangeSample {
    /// Creates a sample, deriving the timecode from the frame rate.
    pub fn new(frame_number: usize, frame_rate: f64, content_val: f64) -> Self {
        let timecode = if frame_rate > 0.0 {
            frame_number as f64 / frame_rate
        } else {
            0.0
        };
        Self {
            frame_number,
            timecode,
            content_val,
        }
    }

    /// Builds a series from raw values, numbering frames from 0.
    pub fn series(values: &[f64], frame_rate: f64) -> Vec<Self> {
        values
            .iter()
            .enumerate()
            .map(|(frame_number, &value)| Self::new(frame_number, frame_rate, value))
            .collect()
    }
}

/// Checks that frame numbers strictly increase and content values are
/// finite and non-negative.
pub fn validate_samples(samples: &[ChangeSample]) -> CoreResult<()> {
    for (i, sample) in samples.iter().enumerate() {
        if !sample.content_val.is_finite() || sample.content_val < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "content_val at frame {} must be finite and non-negative, got {}",
                sample.frame_number, sample.content_val
            )));
        }
        if i > 0 && sample.frame_number <= samples[i - 1].frame_number {
            return Err(CoreError::InvalidInput(format!(
                "frame numbers must strictly increase: {} follows {}",
                sample.frame_number,
                samples[i - 1].frame_number
            )));
        }
    }
    Ok(())
}

/// A detected peak of the smoothed change signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScene {
    pub frame_number: usize,
    pub prominence: f64,
    pub smoothed_content_val: f64,
    pub content_val: f64,
}

/// A deduplicated scene boundary with its decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRecord {
    pub frame_number: usize,
    pub prominence: f64,
    pub smoothed_content_val: f64,
    pub content_val: f64,
    pub frame_image: Frame,
}

impl SceneRecord {
    /// Attaches a decoded frame to a candidate.
    pub fn from_candidate(candidate: &CandidateScene, frame_image: Frame) -> Self {
        Self {
            frame_number: candidate.frame_number,
            prominence: candidate.prominence,
            smoothed_content_val: candidate.smoothed_content_val,
            content_val: candidate.content_val,
            frame_image,
        }
    }

    /// Seconds from the start of the video at the given frame rate.
    pub fn timecode(&self, frame_rate: f64) -> f64 {
        if frame_rate > 0.0 {
            self.frame_number as f64 / frame_rate
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_timecodes() {
        let samples = ChangeSample::series(&[0.0, 1.0, 2.0], 25.0);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].frame_number, 2);
        assert!((samples[2].timecode - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_validate_samples_rejects_unordered_frames() {
        let mut samples = ChangeSample::series(&[1.0, 1.0, 1.0], 25.0);
        samples[2].frame_number = 1;
        assert!(matches!(validate_samples(&samples), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_samples_rejects_negative_values() {
        let samples = ChangeSample::series(&[1.0, -2.0], 25.0);
        assert!(matches!(validate_samples(&samples), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_samples_accepts_gaps() {
        let samples = vec![
            ChangeSample::new(3, 30.0, 0.5),
            ChangeSample::new(7, 30.0, 9.0),
        ];
        assert!(validate_samples(&samples).is_ok());
    }
}

//! Video frame access
//!
//! This module defines the video reader collaborator used by the frame
//! sampler: a `VideoSource` opens a path into a `VideoReader` handle that can
//! seek, report where a seek actually landed, decode and skip frames. The
//! production reader decodes through ffmpeg; tests use the in-memory reader
//! from `external::mocks`.

pub mod ffmpeg_reader;
pub mod reader;

/// A decoded video frame.
///
/// Frames keep their native pixel layout (8-bit, 16-bit or float, with or
/// without colour) so that similarity scoring can pick the right value range.
pub type Frame = image::DynamicImage;

// Re-export commonly used types
pub use ffmpeg_reader::{FfmpegVideoReader, FfmpegVideoSource};
pub use reader::{VideoReader, VideoSource};

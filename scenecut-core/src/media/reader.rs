// ============================================================================
// scenecut-core/src/media/reader.rs
// ============================================================================
//
// VIDEO READER: Seekable Frame Source Abstraction
//
// Containers with variable frame rates cannot be seeked to an exact frame
// number, so a reader reports the index it actually landed on after a seek.
// The frame sampler uses that readback to walk forward or retry.
//
// AI-ASSISTANT-INFO: Traits for opening videos and reading frames

use super::Frame;
use crate::error::CoreResult;
use std::path::Path;

/// Opens videos into reader handles.
pub trait VideoSource {
    type Reader: VideoReader;

    /// Opens `path` for frame access. The handle is released when dropped.
    fn open(&self, path: &Path) -> CoreResult<Self::Reader>;
}

/// An open video handle.
pub trait VideoReader {
    /// Total number of frames in the video.
    fn frame_count(&self) -> usize;

    /// Average frames per second.
    fn frame_rate(&self) -> f64;

    /// Requests a seek to `index`. The landing point may differ from the
    /// request on VFR content; check it with `position`.
    fn seek(&mut self, index: usize) -> CoreResult<()>;

    /// Index of the frame the next `read` or `grab` will return.
    fn position(&mut self) -> CoreResult<usize>;

    /// Decodes the frame at the current position and advances by one.
    /// Returns `None` at end of stream or when the frame cannot be decoded.
    fn read(&mut self) -> CoreResult<Option<Frame>>;

    /// Advances past the current frame without handing it out.
    /// Returns `false` at end of stream.
    fn grab(&mut self) -> CoreResult<bool>;
}

// ============================================================================
// scenecut-core/src/processing/frame_sampler.rs
// ============================================================================
//
// FRAME SAMPLER: VFR-Safe Random Access to Single Frames
//
// Seeking by frame number is only approximate on variable-frame-rate video.
// After every seek the sampler reads back where the reader actually landed:
//
//   exact      -> read
//   too early  -> grab forward to the target, then read
//   too late   -> seek again SAFETY_MARGIN frames earlier and walk forward;
//                 if that still overshoots, rewind to frame 0 and walk
//
// KEY COMPONENTS:
// - FrameSampler: get_frame / get_frames over a VideoSource
// - ForwardWalker: one reader handle serving strictly increasing indices
//
// AI-ASSISTANT-INFO: Frame retrieval with landed-position correction

// ---- Internal crate imports ----
use crate::config::{DEFAULT_VFR_SAFETY_MARGIN, FrameAccess};
use crate::error::{CoreError, CoreResult, frame_read_error};
use crate::media::{Frame, VideoReader, VideoSource};

// ---- Standard library imports ----
use std::path::Path;

/// Retrieves individual frames by 0-based index.
#[derive(Debug, Clone)]
pub struct FrameSampler<V> {
    source: V,
    safety_margin: usize,
}

impl<V: VideoSource> FrameSampler<V> {
    /// Creates a sampler with the default safety margin of 100 frames.
    pub fn new(source: V) -> Self {
        Self::with_safety_margin(source, DEFAULT_VFR_SAFETY_MARGIN)
    }

    /// Creates a sampler that backs off `safety_margin` frames after an
    /// overshooting seek.
    pub fn with_safety_margin(source: V, safety_margin: usize) -> Self {
        Self {
            source,
            safety_margin,
        }
    }

    pub fn source(&self) -> &V {
        &self.source
    }

    pub fn safety_margin(&self) -> usize {
        self.safety_margin
    }

    /// Returns the decoded frame at `index`.
    ///
    /// # Returns
    ///
    /// * `Ok(Frame)` - The frame at exactly `index`
    /// * `Err(CoreError::NotFound)` - If the path does not exist
    /// * `Err(CoreError::FrameIndexOutOfRange)` - If `index >= frame_count`
    /// * `Err(CoreError::FrameRead)` - If seeking or decoding fails
    pub fn get_frame(&self, path: &Path, index: usize) -> CoreResult<Frame> {
        let mut reader = self.open(path)?;
        check_index(path, index, reader.frame_count())?;
        seek_exact(&mut reader, path, index, self.safety_margin)?;
        read_current(&mut reader, path, index)
        // reader released here, on success and on every error path above
    }

    /// Returns the frames at `indices`, in the same order.
    ///
    /// `FrameAccess::ForwardWalk` shares one reader and requires strictly
    /// increasing indices.
    pub fn get_frames(
        &self,
        path: &Path,
        indices: &[usize],
        access: FrameAccess,
    ) -> CoreResult<Vec<Frame>> {
        self.get_frames_with(path, indices, access, |_| Ok(()))
    }

    /// Like `get_frames`, calling `before_each` with each index before it is
    /// fetched. An error from the hook aborts the batch.
    pub fn get_frames_with<F>(
        &self,
        path: &Path,
        indices: &[usize],
        access: FrameAccess,
        mut before_each: F,
    ) -> CoreResult<Vec<Frame>>
    where
        F: FnMut(usize) -> CoreResult<()>,
    {
        let mut frames = Vec::with_capacity(indices.len());
        match access {
            FrameAccess::Independent => {
                for &index in indices {
                    before_each(index)?;
                    frames.push(self.get_frame(path, index)?);
                }
            }
            FrameAccess::ForwardWalk => {
                let mut walker = self.forward_walker(path)?;
                for &index in indices {
                    before_each(index)?;
                    frames.push(walker.frame(index)?);
                }
            }
        }
        Ok(frames)
    }

    /// Opens one reader for a pass over strictly increasing indices.
    pub fn forward_walker<'a>(&self, path: &'a Path) -> CoreResult<ForwardWalker<'a, V::Reader>> {
        Ok(ForwardWalker {
            reader: self.open(path)?,
            path,
            last: None,
            safety_margin: self.safety_margin,
        })
    }

    fn open(&self, path: &Path) -> CoreResult<V::Reader> {
        if !path.exists() {
            return Err(CoreError::NotFound(path.to_path_buf()));
        }
        self.source.open(path)
    }
}

/// A single reader walking forward through a video.
///
/// Gaps up to the safety margin are covered by grabbing frames; longer gaps
/// use the same VFR-safe seek as `FrameSampler::get_frame`, so both access
/// modes return identical frames.
pub struct ForwardWalker<'a, R: VideoReader> {
    reader: R,
    path: &'a Path,
    last: Option<usize>,
    safety_margin: usize,
}

impl<R: VideoReader> ForwardWalker<'_, R> {
    /// Returns the frame at `index`, which must be greater than the previous one.
    pub fn frame(&mut self, index: usize) -> CoreResult<Frame> {
        check_index(self.path, index, self.reader.frame_count())?;
        if let Some(last) = self.last {
            if index <= last {
                return Err(CoreError::InvalidInput(format!(
                    "forward walk requires strictly increasing frame indices, got {index} after {last}"
                )));
            }
        }

        let current = self.reader.position()?;
        if index >= current && index - current <= self.safety_margin {
            log::debug!("Walking {} frames forward to {}", index - current, index);
            walk_forward(&mut self.reader, self.path, current, index)?;
        } else {
            seek_exact(&mut self.reader, self.path, index, self.safety_margin)?;
        }

        let frame = read_current(&mut self.reader, self.path, index)?;
        self.last = Some(index);
        Ok(frame)
    }
}

// ---- Positioning ----

fn check_index(path: &Path, index: usize, frame_count: usize) -> CoreResult<()> {
    if index >= frame_count {
        return Err(CoreError::FrameIndexOutOfRange {
            path: path.to_path_buf(),
            index,
            frame_count,
        });
    }
    Ok(())
}

/// Leaves `reader` positioned so the next read returns frame `index`.
fn seek_exact<R: VideoReader>(
    reader: &mut R,
    path: &Path,
    index: usize,
    safety_margin: usize,
) -> CoreResult<()> {
    reader.seek(index)?;
    let landed = reader.position()?;

    if landed == index {
        log::debug!("Seek to frame {} landed exactly", index);
        return Ok(());
    }
    if landed < index {
        log::debug!("Seek to frame {} landed early at {}, walking forward", index, landed);
        return walk_forward(reader, path, landed, index);
    }

    let retry = index.saturating_sub(safety_margin);
    log::debug!(
        "Seek to frame {} overshot to {}, retrying from {}",
        index,
        landed,
        retry
    );
    reader.seek(retry)?;
    let mut landed = reader.position()?;

    if landed > index {
        log::debug!(
            "Retry for frame {} still overshot to {}, rewinding to the start",
            index,
            landed
        );
        reader.seek(0)?;
        landed = reader.position()?;
        if landed > index {
            return Err(frame_read_error(
                path,
                index,
                format!("seek to the start of the video landed at frame {landed}"),
            ));
        }
    }
    walk_forward(reader, path, landed, index)
}

/// Grabs frames from `from` up to (not including) `to`.
fn walk_forward<R: VideoReader>(reader: &mut R, path: &Path, from: usize, to: usize) -> CoreResult<()> {
    for current in from..to {
        log::trace!("Grabbing frame {}", current);
        if !reader.grab()? {
            return Err(frame_read_error(
                path,
                to,
                format!("stream ended at frame {current} while walking forward"),
            ));
        }
    }
    Ok(())
}

fn read_current<R: VideoReader>(reader: &mut R, path: &Path, index: usize) -> CoreResult<Frame> {
    reader
        .read()?
        .ok_or_else(|| frame_read_error(path, index, "decoder returned no frame"))
}

// ============================================================================
// scenecut-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types and Constructors
//
// This module defines the error type shared by every scenecut-core operation.
// Frame access failures carry the frame index and source path so that a
// missing scene can always be traced back to the exact read that failed.
//
// KEY COMPONENTS:
// - CoreError: the error enum (thiserror)
// - CoreResult: result alias used across the crate
// - Constructors for external process failures
//
// AI-ASSISTANT-INFO: Error types for the scenecut-core library

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors produced by the scenecut-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Video file not found: {0}")]
    NotFound(PathBuf),

    #[error("Frame index {index} out of range for {path} ({frame_count} frames)")]
    FrameIndexOutOfRange {
        path: PathBuf,
        index: usize,
        frame_count: usize,
    },

    #[error("Failed to read frame {index} from {path}: {reason}")]
    FrameRead {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to start command '{command}': {source}")]
    CommandStart {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed waiting for command '{command}': {source}")]
    CommandWait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("ffprobe output could not be interpreted: {0}")]
    FfprobeParse(String),

    #[error("Video information error: {0}")]
    VideoInfo(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("No video files found")]
    NoFilesFound,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scenecut-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a process that could not be spawned.
pub fn command_start_error(command: impl Into<String>, source: std::io::Error) -> CoreError {
    CoreError::CommandStart {
        command: command.into(),
        source,
    }
}

/// Builds a `CommandFailed` error for a process that exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a `CommandWait` error for a process whose exit could not be collected.
pub fn command_wait_error(command: impl Into<String>, source: std::io::Error) -> CoreError {
    CoreError::CommandWait {
        command: command.into(),
        source,
    }
}

/// Builds a `FrameRead` error naming the frame and its source video.
pub fn frame_read_error(
    path: impl Into<PathBuf>,
    index: usize,
    reason: impl Into<String>,
) -> CoreError {
    CoreError::FrameRead {
        path: path.into(),
        index,
        reason: reason.into(),
    }
}

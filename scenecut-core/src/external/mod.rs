// ============================================================================
// scenecut-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates interactions with the external command-line tools
// the scene detector relies on. The ffmpeg side sits behind the
// FfmpegSpawner/FfmpegProcess traits so frame decoding and change-signal
// extraction can be driven by scripted events in tests.
//
// KEY COMPONENTS:
// - FfmpegSpawner / FfmpegProcess and their ffmpeg-sidecar implementation
// - ffprobe-based VideoProperties
// - Dependency checking
// - Test mocks (feature `test-mocks`)
//
// AI-ASSISTANT-INFO: External tool interactions and abstractions for ffmpeg/ffprobe

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult, command_start_error};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Contains ffprobe-based video property detection
pub mod ffprobe_executor;

/// Scripted stand-ins for ffmpeg, video readers and change signals
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{VideoProperties, get_video_properties, parse_frame_rate};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// This function attempts to run the specified command with a `-version` argument
/// to verify that it exists and is executable.
///
/// # Arguments
///
/// * `cmd_name` - The name of the command to check (e.g., "ffmpeg")
///
/// # Returns
///
/// * `Ok(())` - If the command was found
/// * `Err(CoreError::DependencyNotFound)` - If the command is not found
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(command_start_error(cmd_name, e))
        }
    }
}

/// Checks that both ffmpeg and ffprobe are available.
pub fn check_ffmpeg_tools() -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency() {
        let result = check_dependency("scenecut-definitely-not-a-command");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}

// ============================================================================
// scenecut-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. Consumers pull events one at a time, so a long-running decode
// can be stopped as soon as the wanted frames have arrived.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
//
// ARCHITECTURE:
// The module follows a trait-based design that allows for flexible process
// management and testing through dependency injection patterns.
//
// AI-ASSISTANT-INFO: FFmpeg process management and execution abstraction

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use ffmpeg_sidecar::iter::FfmpegIterator;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Returns the next event, or `None` once the process output is exhausted.
    fn next_event(&mut self) -> CoreResult<Option<FfmpegEvent>>;

    /// Processes all remaining events using a provided handler closure.
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        while let Some(event) = self.next_event()? {
            handler(event)?;
        }
        Ok(())
    }

    /// Terminates the process. Killing an already finished process is not an error.
    fn kill(&mut self) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess {
    child: SidecarChild,
    // Created on first use; taking the iterator claims the child's stdout and stderr
    events: Option<FfmpegIterator>,
}

impl FfmpegProcess for SidecarProcess {
    fn next_event(&mut self) -> CoreResult<Option<FfmpegEvent>> {
        if self.events.is_none() {
            let iterator = self.child.iter().map_err(|e| {
                log::error!("Failed to get ffmpeg event iterator: {}", e);
                command_failed_error(
                    "ffmpeg (sidecar - get iter)",
                    ExitStatus::default(),
                    e.to_string(),
                )
            })?;
            self.events = Some(iterator);
        }
        Ok(self.events.as_mut().and_then(|events| events.next()))
    }

    fn kill(&mut self) -> CoreResult<()> {
        match self.child.kill() {
            Ok(()) => Ok(()),
            // Already exited
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(command_wait_error("ffmpeg (sidecar - kill)", e)),
        }
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.child
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        log::debug!("Spawning ffmpeg: {:?}", cmd);
        cmd.spawn()
            .map(|child| SidecarProcess { child, events: None })
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

/// Runs a command to completion, collecting its log lines, and fails if
/// ffmpeg exits unsuccessfully.
///
/// # Arguments
///
/// * `spawner` - The spawner used to launch ffmpeg
/// * `cmd` - The command to run
/// * `context` - Short description used in error messages
/// * `on_log` - Called with every log line in output order
pub fn run_collecting_logs<S, F>(
    spawner: &S,
    cmd: FfmpegCommand,
    context: &str,
    mut on_log: F,
) -> CoreResult<()>
where
    S: FfmpegSpawner,
    F: FnMut(&str),
{
    let mut process = spawner.spawn(cmd)?;
    let mut last_error = String::new();

    process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(_, line) => on_log(&line),
            FfmpegEvent::Error(message) => {
                log::debug!("ffmpeg ({}) reported: {}", context, message);
                last_error = message;
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        log::error!("ffmpeg ({}) failed: {}", context, status);
        return Err(command_failed_error(
            format!("ffmpeg ({context})"),
            status,
            last_error,
        ));
    }
    Ok(())
}

// ============================================================================
// vconvert-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interaction with the ffmpeg Command-Line Transcoder
//
// All media processing is delegated to an external ffmpeg binary. This module
// hides process management behind two traits so the job runner can be driven
// by a real subprocess or by a scripted stand-in in tests.
//
// KEY COMPONENTS:
// - TranscoderProcess / TranscoderSpawner: process abstraction
// - SidecarTranscoder: ffmpeg-sidecar implementation
// - build_arguments / probe_arguments: argument vectors
// - locate_transcoder / check_dependency: discovery and sanity checks

use crate::error::{CoreError, CoreResult};

use ffmpeg_sidecar::event::FfmpegEvent;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Argument construction for probe and conversion runs
pub mod ffmpeg_args;

/// Subprocess-backed spawner
pub mod transcoder;

pub use ffmpeg_args::{VideoFilterChain, build_arguments, probe_arguments};
pub use transcoder::{SidecarProcess, SidecarTranscoder};

// ============================================================================
// PROCESS ABSTRACTION
// ============================================================================

/// A running transcoder instance.
pub trait TranscoderProcess {
    /// Feeds the events parsed from the diagnostic stream to `handler`, in
    /// order, stopping at the first error. The stream is closed on return.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for exit. A process terminated by a signal reports -1.
    fn wait(&mut self) -> CoreResult<i32>;

    /// Terminates the process. Killing an already exited process is not an error.
    fn kill(&mut self) -> CoreResult<()>;
}

/// Something that can start transcoder processes.
pub trait TranscoderSpawner: Send + Sync {
    type Process: TranscoderProcess;

    /// Starts the transcoder with `args`, diagnostics piped.
    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process>;

    /// Runs the transcoder to completion and returns all of its text output,
    /// whatever the exit status.
    fn run_to_completion(&self, args: &[String]) -> CoreResult<String>;

    /// Program name used in messages.
    fn program(&self) -> &str;
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Resolves the transcoder program to an executable path.
///
/// Bare names are looked up on `PATH`; anything with a directory component
/// must point at an existing file.
pub fn locate_transcoder(program: &Path) -> CoreResult<PathBuf> {
    let found = if program.components().count() > 1 {
        program.is_file().then(|| program.to_path_buf())
    } else {
        which::which(program).ok()
    };

    match found {
        Some(path) => {
            log::debug!("Using transcoder at {}", path.display());
            Ok(path)
        }
        None => {
            log::warn!("Transcoder '{}' not found.", program.display());
            Err(CoreError::DependencyNotFound(program.display().to_string()))
        }
    }
}

/// Checks that the transcoder starts by running `<program> -version`.
pub fn check_dependency(program: &Path) -> CoreResult<()> {
    let result = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) => {
            log::debug!("'{} -version' exited with {}", program.display(), status);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", program.display());
            Err(CoreError::DependencyNotFound(program.display().to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check '{}': {}", program.display(), e);
            Err(CoreError::CommandStart(program.display().to_string(), e))
        }
    }
}

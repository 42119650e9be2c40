// ============================================================================
// vconvert-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for vconvert-core
//
// Every failure the conversion controller can report, from input selection
// through process spawning to the final exit code. All of them are local and
// non-fatal: the caller reports the error once and is free to try again.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the conversion job controller.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No video selected")]
    NoInputSelected,

    #[error("File does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("Could not determine video duration for {}", .0.display())]
    DurationUnknown(PathBuf),

    #[error("Output path must differ from the input path: {}", .0.display())]
    OutputSameAsInput(PathBuf),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Unknown preset '{preset}' for format {format}")]
    UnknownPreset { format: String, preset: String },

    #[error("Unknown resolution: {0}")]
    UnknownResolution(String),

    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    #[error("A conversion is already running")]
    JobActive,

    #[error("Required external tool not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}. Please check if FFmpeg is installed.")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed while reading '{0}' output: {1}")]
    StreamRead(String, #[source] io::Error),

    #[error("Conversion failed (exit code {0}). Please check if FFmpeg is installed.")]
    ConversionFailed(i32),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for vconvert-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds the error reported when the external tool cannot be started.
pub fn command_start_error(program: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(program.into(), err)
}

/// Builds the error reported when the diagnostic stream breaks mid-run.
pub fn stream_read_error(program: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::StreamRead(program.into(), err)
}

impl CoreError {
    /// A short follow-up hint for the user, when one is useful.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CoreError::DependencyNotFound(_) | CoreError::CommandStart(..) => {
                Some("Install FFmpeg or point --ffmpeg / VCONVERT_FFMPEG at the binary")
            }
            CoreError::ConversionFailed(_) => {
                Some("Verify the FFmpeg installation and run with --verbose for details")
            }
            CoreError::DurationUnknown(_) => {
                Some("The file may not be a readable video; try opening it in a player")
            }
            CoreError::UnsupportedInput(_) => Some("Supported inputs: mp4, mov, avi, mkv, webm"),
            _ => None,
        }
    }
}

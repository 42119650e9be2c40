//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `convert` command.
pub mod convert;

/// Verifies the configured ffmpeg binary.
pub mod check;

/// Lists formats and presets.
pub mod formats;

/// Prints the probed duration of a video.
pub mod probe;

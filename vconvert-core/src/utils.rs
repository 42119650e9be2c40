//! Utility functions for formatting and input path handling.
//!
//! This module provides general-purpose helpers used throughout the
//! vconvert-core library: duration formatting, input extension checks and
//! cleanup of paths handed over by drag-and-drop style front ends.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Video container extensions accepted as conversion input (compared
/// case-insensitively).
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

/// Checks whether the path carries one of the supported input extensions.
/// Does not touch the file system.
#[must_use]
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_INPUT_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Validates a user-selected input: the extension must be on the allow-list
/// and the file must exist.
pub fn validate_input(path: &Path) -> CoreResult<PathBuf> {
    if !has_supported_extension(path) {
        return Err(CoreError::UnsupportedInput(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(CoreError::InputNotFound(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// Strips the wrapping that drop targets put around paths containing spaces,
/// e.g. `{/videos/my clip.mp4}` or `"/videos/my clip.mp4"`.
#[must_use]
pub fn normalize_dropped_path(raw: &str) -> PathBuf {
    let mut path = raw.trim();
    if let Some(inner) = path.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
        path = inner;
    }
    if let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) {
        path = inner;
    }
    PathBuf::from(path)
}

/// Formats seconds as HH:MM:SS, truncating any fraction (e.g., 3725.9 -> "01:02:05").
/// Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

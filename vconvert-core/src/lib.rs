//! Core library for converting a single video file with ffmpeg.
//!
//! This crate provides the format and preset catalog, ffmpeg argument
//! building, progress parsing and a single-job controller that runs ffmpeg on
//! a worker thread and hands progress back to the caller over a channel.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vconvert_core::{Converter, OutputFormat, SidecarTranscoder};
//! use std::path::Path;
//!
//! let mut converter = Converter::new(SidecarTranscoder::new("ffmpeg"));
//! converter.select_input(Path::new("/videos/clip.mov")).unwrap();
//!
//! let request = converter
//!     .prepare_request(None, Some(OutputFormat::Mp4), Some("Balanced"))
//!     .unwrap();
//! converter.start(request).unwrap();
//!
//! if let Some(job) = converter.wait_until_finished() {
//!     println!("{}", job.completion_message().unwrap_or_default());
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod converter;
pub mod error;
pub mod external;
pub mod job;
pub mod progress;
pub mod request;
pub mod runner;
pub mod utils;

// Re-exports for public API
pub use catalog::{OutputFormat, Preset, VideoCodec, default_preset, presets_for};
pub use config::{ConverterConfig, ConverterConfigBuilder};
pub use converter::Converter;
pub use error::{CoreError, CoreResult};
pub use external::{
    SidecarTranscoder, TranscoderProcess, TranscoderSpawner, build_arguments, check_dependency,
    locate_transcoder,
};
pub use job::{ConversionJob, JobId, JobState};
pub use progress::{ProgressSnapshot, parse_duration, parse_elapsed, parse_timestamp};
pub use request::{ConversionRequest, Overrides, RateControlOverride, Resolution, default_output_path};
pub use runner::{JobEvent, probe_duration, run_conversion, spawn_conversion};
pub use utils::{format_duration, normalize_dropped_path, validate_input};

//! Configuration for the vconvert-core library.
//!
//! Holds the settings that outlive a single conversion: which transcoder
//! binary to run and which format a request defaults to.

mod builder;

pub use builder::ConverterConfigBuilder;

use crate::catalog::OutputFormat;
use crate::error::{CoreError, CoreResult};
use crate::external::locate_transcoder;
use crate::request::Resolution;
use std::path::PathBuf;

/// Transcoder program used when none is configured. Looked up on `PATH`.
pub const DEFAULT_TRANSCODER: &str = "ffmpeg";

/// Environment variable the CLI reads for the transcoder path.
pub const TRANSCODER_ENV_VAR: &str = "VCONVERT_FFMPEG";

/// Main configuration structure for the converter.
///
/// # Examples
///
/// ```rust
/// use vconvert_core::config::ConverterConfigBuilder;
/// use vconvert_core::OutputFormat;
///
/// let config = ConverterConfigBuilder::new()
///     .transcoder("/usr/local/bin/ffmpeg")
///     .default_format(OutputFormat::Webm)
///     .build()
///     .unwrap();
/// assert_eq!(config.default_format, OutputFormat::Webm);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    /// Program name or path of the ffmpeg binary
    pub transcoder: PathBuf,

    /// Output format used when a request names none
    pub default_format: OutputFormat,

    /// Output resolution used when a request names none
    pub default_resolution: Resolution,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            transcoder: PathBuf::from(DEFAULT_TRANSCODER),
            default_format: OutputFormat::default(),
            default_resolution: Resolution::default(),
        }
    }
}

impl ConverterConfig {
    /// Checks the settings without touching the file system.
    pub fn validate(&self) -> CoreResult<()> {
        if self.transcoder.as_os_str().is_empty() {
            return Err(CoreError::Config("transcoder path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Resolves the transcoder to an executable path.
    pub fn resolve_transcoder(&self) -> CoreResult<PathBuf> {
        self.validate()?;
        locate_transcoder(&self.transcoder)
    }
}

// ============================================================================
// vconvert-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for ConverterConfig
//
// Fluent construction of ConverterConfig. Unset fields keep their defaults
// and build() validates the result.

use std::path::PathBuf;

use super::ConverterConfig;
use crate::catalog::OutputFormat;
use crate::error::CoreResult;
use crate::request::Resolution;

/// Builder for creating ConverterConfig instances.
#[derive(Debug, Clone, Default)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transcoder program name or path.
    #[must_use]
    pub fn transcoder(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.transcoder = program.into();
        self
    }

    #[must_use]
    pub fn default_format(mut self, format: OutputFormat) -> Self {
        self.config.default_format = format;
        self
    }

    #[must_use]
    pub fn default_resolution(mut self, resolution: Resolution) -> Self {
        self.config.default_resolution = resolution;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> CoreResult<ConverterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

//! Conversion requests: what to convert, into what, and how.
//!
//! A request is validated once when it is assembled. Overrides that the
//! selected preset's codec cannot honour are rejected here, so the argument
//! builder can trust every request it receives.

use crate::catalog::{OutputFormat, Preset, default_preset};
use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Target output width. Height always follows the source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    /// Keep the source dimensions.
    #[default]
    Original,
    Uhd2160,
    Qhd1440,
    Fhd1080,
    Hd720,
    Sd480,
}

impl Resolution {
    #[must_use]
    pub fn all() -> &'static [Resolution] {
        &[
            Resolution::Original,
            Resolution::Uhd2160,
            Resolution::Qhd1440,
            Resolution::Fhd1080,
            Resolution::Hd720,
            Resolution::Sd480,
        ]
    }

    /// Target width in pixels, `None` for the source size.
    #[must_use]
    pub fn width(&self) -> Option<u32> {
        match self {
            Resolution::Original => None,
            Resolution::Uhd2160 => Some(3840),
            Resolution::Qhd1440 => Some(2560),
            Resolution::Fhd1080 => Some(1920),
            Resolution::Hd720 => Some(1280),
            Resolution::Sd480 => Some(854),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Original => "original",
            Resolution::Uhd2160 => "2160p",
            Resolution::Qhd1440 => "1440p",
            Resolution::Fhd1080 => "1080p",
            Resolution::Hd720 => "720p",
            Resolution::Sd480 => "480p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resolution {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "original" | "source" => Ok(Resolution::Original),
            "4k" => Ok(Resolution::Uhd2160),
            other => Resolution::all()
                .iter()
                .copied()
                .find(|r| r.label() == other)
                .ok_or_else(|| CoreError::UnknownResolution(s.to_string())),
        }
    }
}

/// Manual control over the preset's rate-control value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateControlOverride {
    /// Use the preset's value.
    #[default]
    Preset,
    /// Emit no rate-control flag; the encoder falls back to its own default.
    Disabled,
    /// Replace the preset's value.
    Value(u8),
}

/// Advanced-panel overrides for a single conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub rate_control: RateControlOverride,
    pub speed: Option<String>,
}

/// Everything needed to build one ffmpeg invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub preset: &'static Preset,
    pub resolution: Resolution,
    pub overrides: Overrides,
}

impl ConversionRequest {
    /// Creates a request for `format`, using the named preset or the
    /// format's default when `preset_name` is `None`.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        format: OutputFormat,
        preset_name: Option<&str>,
    ) -> CoreResult<Self> {
        let input = input.into();
        let output = output.into();
        if input == output {
            return Err(CoreError::OutputSameAsInput(output));
        }

        let preset = match preset_name {
            Some(name) => format.find_preset(name)?,
            None => default_preset(format),
        };

        Ok(Self {
            input,
            output,
            format,
            preset,
            resolution: Resolution::Original,
            overrides: Overrides::default(),
        })
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Applies advanced overrides after checking them against the preset's codec.
    pub fn with_overrides(mut self, overrides: Overrides) -> CoreResult<Self> {
        let codec = self.preset.codec;

        match (overrides.rate_control, codec.rate_control()) {
            (RateControlOverride::Preset, _) => {}
            (_, None) => {
                return Err(CoreError::InvalidOverride(format!(
                    "{} ({}) has no rate control",
                    self.preset.name,
                    codec.encoder_name()
                )));
            }
            (RateControlOverride::Value(value), Some(rc)) if !rc.accepts(value) => {
                return Err(CoreError::InvalidOverride(format!(
                    "{} value {} is outside {}..={} for {}",
                    rc.flag,
                    value,
                    rc.min,
                    rc.max,
                    codec.encoder_name()
                )));
            }
            _ => {}
        }

        if let Some(speed) = overrides.speed.as_deref() {
            if codec.speed_flag().is_none() {
                return Err(CoreError::InvalidOverride(format!(
                    "{} has no speed setting",
                    codec.encoder_name()
                )));
            }
            if !codec.speed_values().contains(&speed) {
                return Err(CoreError::InvalidOverride(format!(
                    "speed '{}' is not one of: {}",
                    speed,
                    codec.speed_values().join(", ")
                )));
            }
        }

        self.overrides = overrides;
        Ok(self)
    }

    /// Rate-control value to emit, after overrides.
    #[must_use]
    pub fn effective_quality(&self) -> Option<u8> {
        match self.overrides.rate_control {
            RateControlOverride::Preset => self.preset.quality,
            RateControlOverride::Disabled => None,
            RateControlOverride::Value(value) => Some(value),
        }
    }

    /// Speed knob value to emit, after overrides.
    #[must_use]
    pub fn effective_speed(&self) -> Option<&str> {
        self.overrides.speed.as_deref().or(self.preset.speed)
    }
}

/// Default output location: next to the input, `<stem>_converted.<ext>`.
#[must_use]
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!("{}_converted.{}", stem, format.extension()))
}

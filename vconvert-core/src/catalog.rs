//! Output formats and their quality presets.
//!
//! The catalog is static: every format owns an ordered, non-empty list of
//! presets and the first entry is the default. Each preset pins a video codec
//! and either a continuous rate-control value or a discrete profile index,
//! never both.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// Video encoders the catalog can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoCodec {
    H264,
    H265,
    ProRes,
    Mpeg4,
    Vp9,
}

/// Flag and accepted range of a codec's continuous quality knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateControl {
    pub flag: &'static str,
    pub min: u8,
    pub max: u8,
}

impl RateControl {
    #[must_use]
    pub fn accepts(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// x264/x265 speed presets, fastest first.
pub const X26X_SPEEDS: &[&str] = &[
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
];

/// libvpx-vp9 `-cpu-used` values accepted in good-quality mode.
pub const VP9_SPEEDS: &[&str] = &["0", "1", "2", "3", "4", "5"];

impl VideoCodec {
    /// Encoder name passed to `-c:v`.
    #[must_use]
    pub fn encoder_name(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "libx264",
            VideoCodec::H265 => "libx265",
            VideoCodec::ProRes => "prores_ks",
            VideoCodec::Mpeg4 => "mpeg4",
            VideoCodec::Vp9 => "libvpx-vp9",
        }
    }

    /// Continuous rate control, if the encoder has one. Profile-based
    /// encoders return `None`.
    #[must_use]
    pub fn rate_control(&self) -> Option<RateControl> {
        match self {
            VideoCodec::H264 | VideoCodec::H265 => Some(RateControl { flag: "-crf", min: 0, max: 51 }),
            VideoCodec::Vp9 => Some(RateControl { flag: "-crf", min: 0, max: 63 }),
            VideoCodec::Mpeg4 => Some(RateControl { flag: "-q:v", min: 1, max: 31 }),
            VideoCodec::ProRes => None,
        }
    }

    /// Flag for the speed/compression-effort knob, if the encoder has one.
    #[must_use]
    pub fn speed_flag(&self) -> Option<&'static str> {
        match self {
            VideoCodec::H264 | VideoCodec::H265 => Some("-preset"),
            VideoCodec::Vp9 => Some("-cpu-used"),
            VideoCodec::ProRes | VideoCodec::Mpeg4 => None,
        }
    }

    /// Values accepted by the speed knob. Empty when there is no knob.
    #[must_use]
    pub fn speed_values(&self) -> &'static [&'static str] {
        match self {
            VideoCodec::H264 | VideoCodec::H265 => X26X_SPEEDS,
            VideoCodec::Vp9 => VP9_SPEEDS,
            VideoCodec::ProRes | VideoCodec::Mpeg4 => &[],
        }
    }

    /// Whether the encoder selects quality through discrete profiles.
    #[must_use]
    pub fn has_profiles(&self) -> bool {
        matches!(self, VideoCodec::ProRes)
    }

    /// VP9 only honours `-crf` as constant quality when the target bitrate is zero.
    #[must_use]
    pub fn needs_zero_bitrate(&self) -> bool {
        matches!(self, VideoCodec::Vp9)
    }
}

/// A named bundle of encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub codec: VideoCodec,
    /// Rate-control value; `None` for profile-based codecs.
    pub quality: Option<u8>,
    /// Speed knob value; `None` when the codec has no speed knob.
    pub speed: Option<&'static str>,
    /// Profile index; only set for profile-based codecs.
    pub profile: Option<u8>,
}

const fn crf(name: &'static str, codec: VideoCodec, quality: u8, speed: Option<&'static str>) -> Preset {
    Preset { name, codec, quality: Some(quality), speed, profile: None }
}

const fn profile(name: &'static str, codec: VideoCodec, index: u8) -> Preset {
    Preset { name, codec, quality: None, speed: None, profile: Some(index) }
}

static MP4_PRESETS: [Preset; 6] = [
    crf("High Quality", VideoCodec::H264, 18, Some("slow")),
    crf("Balanced", VideoCodec::H264, 23, Some("medium")),
    crf("Small File", VideoCodec::H264, 28, Some("fast")),
    crf("High Quality (H.265)", VideoCodec::H265, 18, Some("slow")),
    crf("Balanced (H.265)", VideoCodec::H265, 23, Some("medium")),
    crf("Small File (H.265)", VideoCodec::H265, 28, Some("fast")),
];

static MOV_PRESETS: [Preset; 3] = [
    profile("ProRes 422 HQ", VideoCodec::ProRes, 3),
    profile("ProRes 422", VideoCodec::ProRes, 2),
    profile("ProRes 422 Proxy", VideoCodec::ProRes, 0),
];

static AVI_PRESETS: [Preset; 3] = [
    crf("High Quality", VideoCodec::Mpeg4, 2, None),
    crf("Balanced", VideoCodec::Mpeg4, 5, None),
    crf("Small File", VideoCodec::Mpeg4, 8, None),
];

static MKV_PRESETS: [Preset; 3] = [
    crf("High Quality", VideoCodec::H264, 18, Some("slow")),
    crf("Balanced", VideoCodec::H264, 23, Some("medium")),
    crf("Small File", VideoCodec::H264, 28, Some("fast")),
];

static WEBM_PRESETS: [Preset; 3] = [
    crf("High Quality", VideoCodec::Vp9, 18, Some("1")),
    crf("Balanced", VideoCodec::Vp9, 30, Some("2")),
    crf("Small File", VideoCodec::Vp9, 40, Some("4")),
];

/// Output container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Mp4,
    Mov,
    Avi,
    Mkv,
    Webm,
}

impl OutputFormat {
    /// All formats, in the order they are offered to the user.
    #[must_use]
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Mp4,
            OutputFormat::Mov,
            OutputFormat::Avi,
            OutputFormat::Mkv,
            OutputFormat::Webm,
        ]
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "MP4",
            OutputFormat::Mov => "MOV",
            OutputFormat::Avi => "AVI",
            OutputFormat::Mkv => "MKV",
            OutputFormat::Webm => "WEBM",
        }
    }

    /// File extension without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Mov => "mov",
            OutputFormat::Avi => "avi",
            OutputFormat::Mkv => "mkv",
            OutputFormat::Webm => "webm",
        }
    }

    /// Presets for this format, default first.
    #[must_use]
    pub fn presets(&self) -> &'static [Preset] {
        match self {
            OutputFormat::Mp4 => &MP4_PRESETS,
            OutputFormat::Mov => &MOV_PRESETS,
            OutputFormat::Avi => &AVI_PRESETS,
            OutputFormat::Mkv => &MKV_PRESETS,
            OutputFormat::Webm => &WEBM_PRESETS,
        }
    }

    /// The preset selected when the user has not picked one.
    #[must_use]
    pub fn default_preset(&self) -> &'static Preset {
        &self.presets()[0]
    }

    /// Looks up a preset by name, ignoring ASCII case.
    pub fn find_preset(&self, name: &str) -> CoreResult<&'static Preset> {
        let wanted = name.trim();
        self.presets()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownPreset {
                format: self.display_name().to_string(),
                preset: wanted.to_string(),
            })
    }
}

/// Ordered presets for `format`.
#[must_use]
pub fn presets_for(format: OutputFormat) -> &'static [Preset] {
    format.presets()
}

/// First preset of `format`.
#[must_use]
pub fn default_preset(format: OutputFormat) -> &'static Preset {
    format.default_preset()
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('.');
        OutputFormat::all()
            .iter()
            .copied()
            .find(|f| f.extension().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownFormat(s.to_string()))
    }
}

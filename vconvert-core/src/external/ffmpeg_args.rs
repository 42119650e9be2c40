//! ffmpeg argument construction
//!
//! Turns a validated [`ConversionRequest`] into the argument vector for one
//! ffmpeg run. Every consistency check happens when the request is built, so
//! nothing here can fail.

use crate::request::ConversionRequest;
use std::path::Path;

/// Builder for constructing video filter chains
#[derive(Default)]
pub struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a width-only scale; `-2` keeps the aspect ratio with an even height.
    #[must_use]
    pub fn add_scale(self, width: Option<u32>) -> Self {
        match width {
            Some(width) => self.add_filter(format!("scale={width}:-2")),
            None => self,
        }
    }

    /// Adds a custom filter to the chain
    #[must_use]
    pub fn add_filter(mut self, filter: String) -> Self {
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    /// Joins the chain, or `None` when it is empty.
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

/// Arguments for a conversion run, excluding the program name.
///
/// Order: input, `-c:v`, rate control, speed, profile, filters, `-c:a copy`,
/// `-y`, output.
#[must_use]
pub fn build_arguments(request: &ConversionRequest) -> Vec<String> {
    let codec = request.preset.codec;
    let mut args = vec![
        "-i".to_string(),
        request.input.to_string_lossy().to_string(),
        "-c:v".to_string(),
        codec.encoder_name().to_string(),
    ];

    if let (Some(rc), Some(value)) = (codec.rate_control(), request.effective_quality()) {
        args.push(rc.flag.to_string());
        args.push(value.to_string());
        if codec.needs_zero_bitrate() {
            args.push("-b:v".to_string());
            args.push("0".to_string());
        }
    }

    if let (Some(flag), Some(speed)) = (codec.speed_flag(), request.effective_speed()) {
        args.push(flag.to_string());
        args.push(speed.to_string());
    }

    if codec.has_profiles() {
        if let Some(profile) = request.preset.profile {
            args.push("-profile:v".to_string());
            args.push(profile.to_string());
        }
    }

    if let Some(filters) = VideoFilterChain::new()
        .add_scale(request.resolution.width())
        .build()
    {
        args.push("-vf".to_string());
        args.push(filters);
    }

    args.extend(["-c:a", "copy", "-y"].map(String::from));
    args.push(request.output.to_string_lossy().to_string());

    log::debug!("Built ffmpeg arguments: {}", args.join(" "));
    args
}

/// Arguments for a duration probe: input only, no output file.
#[must_use]
pub fn probe_arguments(input: &Path) -> Vec<String> {
    vec!["-i".to_string(), input.to_string_lossy().to_string()]
}

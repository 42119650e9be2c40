//! `formats`: the output formats and presets a conversion can choose from.

use crate::cli::FormatsArgs;
use crate::error::CliResult;
use crate::terminal;

use vconvert_core::{OutputFormat, Preset, presets_for};

/// One-line summary of the encoder settings a preset selects.
pub fn describe_preset(preset: &Preset) -> String {
    let codec = preset.codec;
    let mut parts = vec![codec.encoder_name().to_string()];
    if let (Some(rc), Some(value)) = (codec.rate_control(), preset.quality) {
        parts.push(format!("{} {}", rc.flag, value));
    }
    if let (Some(flag), Some(speed)) = (codec.speed_flag(), preset.speed) {
        parts.push(format!("{flag} {speed}"));
    }
    if let Some(profile) = preset.profile {
        parts.push(format!("-profile:v {profile}"));
    }
    parts.join(" ")
}

pub fn run_formats(args: FormatsArgs) -> CliResult<()> {
    let formats: Vec<OutputFormat> = match args.format {
        Some(format) => vec![format],
        None => OutputFormat::all().to_vec(),
    };

    for format in formats {
        terminal::print_section(&format!("{} (.{})", format.display_name(), format.extension()));
        for (index, preset) in presets_for(format).iter().enumerate() {
            let marker = if index == 0 { " (default)" } else { "" };
            println!("  {}{}", preset.name, marker);
            println!("      {}", describe_preset(preset));
        }
    }
    Ok(())
}

//! `probe`: run ffmpeg against an input and print the duration it reports.

use crate::cli::ProbeArgs;
use crate::error::CliResult;
use crate::terminal;

use vconvert_core::{
    ConverterConfig, CoreError, SidecarTranscoder, format_duration, normalize_dropped_path,
    probe_duration, validate_input,
};

pub fn run_probe(config: ConverterConfig, args: ProbeArgs) -> CliResult<()> {
    let input = validate_input(&normalize_dropped_path(&args.input))?;
    let transcoder = SidecarTranscoder::new(config.resolve_transcoder()?);

    let secs = probe_duration(&transcoder, &input)?;
    if secs <= 0.0 {
        return Err(CoreError::DurationUnknown(input));
    }

    terminal::print_section("Probe");
    terminal::print_status("Input", &input.display().to_string());
    terminal::print_status("Duration", &format!("{} ({:.2}s)", format_duration(secs), secs));
    Ok(())
}

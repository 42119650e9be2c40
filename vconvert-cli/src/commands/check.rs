//! `check`: make sure the configured ffmpeg can be found and started.

use crate::error::CliResult;
use crate::terminal;

use vconvert_core::{ConverterConfig, check_dependency};

pub fn run_check(config: ConverterConfig) -> CliResult<()> {
    let program = config.resolve_transcoder()?;
    check_dependency(&program)?;

    terminal::print_section("Dependencies");
    terminal::print_status("ffmpeg", &program.display().to_string());
    terminal::print_success("External dependency check passed.");
    Ok(())
}

// ============================================================================
// vconvert-cli/src/commands/convert.rs
// ============================================================================
//
// CONVERT COMMAND: Select, Probe, Run and Report One Conversion
//
// The foreground loop waits briefly for worker events, drains whatever else
// is queued and renders only the latest progress of each batch.

use crate::cli::ConvertArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal::{self, ProgressDisplay};

use std::io::{self, Write};
use std::time::Duration;
use vconvert_core::{
    ConversionRequest, Converter, ConverterConfig, CoreError, JobEvent, Overrides,
    RateControlOverride, SidecarTranscoder,
};

/// How long the foreground waits for an event before checking again.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Advanced overrides requested on the command line.
pub fn overrides_from_args(args: &ConvertArgs) -> Overrides {
    let rate_control = match (args.no_rate_control, args.quality) {
        (true, _) => RateControlOverride::Disabled,
        (false, Some(value)) => RateControlOverride::Value(value),
        (false, None) => RateControlOverride::Preset,
    };
    Overrides {
        rate_control,
        speed: args.speed.clone(),
    }
}

/// Where job events are rendered.
enum Reporter {
    Json(io::Stdout),
    Terminal(ProgressDisplay),
}

impl Reporter {
    fn report(&mut self, batch: &[JobEvent]) -> CliResult<()> {
        match self {
            Reporter::Json(out) => {
                for event in batch {
                    let line = serde_json::to_string(event)
                        .map_err(|e| CoreError::OperationFailed(format!("Failed to encode event: {e}")))?;
                    writeln!(out, "{line}").cli_context("Failed to write event")?;
                }
                out.flush().cli_context("Failed to write event")?;
            }
            Reporter::Terminal(display) => {
                if let Some(snapshot) = batch.iter().rev().find_map(JobEvent::snapshot) {
                    display.update(&snapshot);
                }
            }
        }
        Ok(())
    }

    fn finish(&self, succeeded: bool) {
        if let Reporter::Terminal(display) = self {
            if succeeded {
                display.finish();
            } else {
                display.abandon();
            }
        }
    }
}

fn print_request(request: &ConversionRequest) {
    terminal::print_section("Conversion");
    terminal::print_status("Input", &request.input.display().to_string());
    terminal::print_status("Output", &request.output.display().to_string());
    terminal::print_status("Format", request.format.display_name());
    terminal::print_status("Preset", request.preset.name);
    terminal::print_status("Resolution", request.resolution.label());
}

/// Runs the `convert` command.
pub fn run_convert(config: ConverterConfig, args: ConvertArgs) -> CliResult<()> {
    let mut converter =
        Converter::with_config(SidecarTranscoder::new(config.transcoder.clone()), config.clone());
    converter.select_dropped(&args.input)?;
    // Input problems are reported before ffmpeg is looked up.
    config.resolve_transcoder()?;

    // Format and resolution arrive as the configured defaults.
    let overrides = overrides_from_args(&args);
    let mut request = converter.prepare_request(args.output.clone(), None, args.preset.as_deref())?;
    if overrides != Overrides::default() {
        request = request.with_overrides(overrides)?;
    }

    if !args.json {
        print_request(&request);
    }

    let id = converter.start(request)?;
    let total_secs = converter
        .current_job()
        .map(|job| job.total_secs)
        .cli_context("Conversion did not start")?;
    log::debug!("{} started, input duration {:.2}s", id, total_secs);

    let mut reporter = if args.json {
        Reporter::Json(io::stdout())
    } else {
        Reporter::Terminal(ProgressDisplay::new(total_secs))
    };

    let mut terminal_event = None;
    while converter.is_busy() {
        let mut batch: Vec<JobEvent> = converter.wait_event(POLL_INTERVAL).into_iter().collect();
        batch.extend(converter.poll());
        if let Some(event) = batch.iter().find(|e| e.is_terminal()) {
            terminal_event = Some(event.clone());
        }
        reporter.report(&batch)?;
    }

    let job = converter.last_job().cli_context("Conversion finished without a result")?;
    match terminal_event {
        Some(JobEvent::Completed { exit_code: 0 }) => {
            reporter.finish(true);
            if !args.json {
                let message = job.completion_message().unwrap_or_default();
                terminal::print_success(&message);
            }
            Ok(())
        }
        Some(JobEvent::Completed { exit_code }) => {
            reporter.finish(false);
            Err(CoreError::ConversionFailed(exit_code))
        }
        Some(JobEvent::Failed { reason }) => {
            reporter.finish(false);
            Err(CoreError::OperationFailed(reason))
        }
        Some(JobEvent::Progress { .. }) | None => {
            reporter.finish(false);
            Err(CoreError::OperationFailed(
                job.completion_message()
                    .unwrap_or_else(|| "Conversion ended without a result".to_string()),
            ))
        }
    }
}

// ============================================================================
// vconvert-cli/src/logging.rs
// ============================================================================
//
// LOGGING: fern Dispatch for Console and Per-Run Log File
//
// Library code logs through the `log` facade. The console only shows
// warnings and errors unless --verbose is given; the optional log file in
// --log-dir always records debug output.

use crate::error::CliResult;

use console::style;
use log::LevelFilter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use vconvert_core::CoreError;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// File name of the log for a run started at `timestamp`.
pub fn log_file_name(timestamp: &str) -> String {
    format!("vconvert_{timestamp}.log")
}

/// Console level for the chosen verbosity.
pub fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn level_label(level: log::Level) -> String {
    let label = format!("{:<5}", level);
    match level {
        log::Level::Error => style(label).red().bold().to_string(),
        log::Level::Warn => style(label).yellow().to_string(),
        log::Level::Info => style(label).green().to_string(),
        log::Level::Debug => style(label).blue().to_string(),
        log::Level::Trace => style(label).magenta().to_string(),
    }
}

/// Installs the global logger. Returns the log file path when one was created.
pub fn setup_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let console = fern::Dispatch::new()
        .level(console_level(verbose))
        .format(|out, message, record| {
            out.finish(format_args!("{} {}", level_label(record.level()), message))
        })
        .chain(io::stderr());

    let mut root = fern::Dispatch::new().level(LevelFilter::Debug).chain(console);

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(&get_timestamp()));
            let file = fern::Dispatch::new()
                .level(LevelFilter::Debug)
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} [{}] {}: {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(fern::log_file(&path)?);
            root = root.chain(file);
            Some(path)
        }
        None => None,
    };

    root.apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))?;

    if let Some(path) = &log_path {
        log::debug!("Logging to {}", path.display());
    }
    Ok(log_path)
}

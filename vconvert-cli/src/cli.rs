// vconvert-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vconvert_core::config::{DEFAULT_TRANSCODER, TRANSCODER_ENV_VAR};
use vconvert_core::{ConverterConfig, ConverterConfigBuilder, CoreResult, OutputFormat, Resolution};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vconvert: single-file video format converter",
    long_about = "Converts one video at a time between MP4, MOV, AVI, MKV and WEBM using ffmpeg via the vconvert-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose console logging for troubleshooting
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Optional: Directory for a per-run debug log file
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// ffmpeg binary name or path
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = TRANSCODER_ENV_VAR,
        default_value = DEFAULT_TRANSCODER
    )]
    pub ffmpeg: PathBuf,
}

impl Cli {
    /// Converter configuration for this invocation. The format and resolution
    /// given to `convert` become the defaults its request is prepared from.
    pub fn converter_config(&self) -> CoreResult<ConverterConfig> {
        let mut builder = ConverterConfigBuilder::new().transcoder(self.ffmpeg.clone());
        if let Commands::Convert(args) = &self.command {
            if let Some(format) = args.format {
                builder = builder.default_format(format);
            }
            if let Some(resolution) = args.resolution {
                builder = builder.default_resolution(resolution);
            }
        }
        builder.build()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts a single video file
    Convert(ConvertArgs),
    /// Lists output formats and their quality presets
    Formats(FormatsArgs),
    /// Prints the duration ffmpeg reports for a video
    Probe(ProbeArgs),
    /// Verifies that ffmpeg can be found and started
    Check,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input video (mp4, mov, avi, mkv or webm). Quoted or {braced} paths are accepted.
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_PATH")]
    pub input: String,

    /// Optional: Output file (defaults to <input stem>_converted.<ext> next to the input)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Output format: mp4, mov, avi, mkv or webm (defaults to mp4)
    #[arg(short = 'f', long, value_name = "FORMAT", value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    /// Optional: Preset name for the chosen format (see `vconvert formats`)
    #[arg(short = 'p', long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Output resolution: original, 2160p, 1440p, 1080p, 720p or 480p
    #[arg(short = 'r', long, value_name = "RESOLUTION", value_parser = parse_resolution)]
    pub resolution: Option<Resolution>,

    // --- Advanced Overrides ---
    /// Optional: Replace the preset's rate-control value (e.g. CRF)
    #[arg(long, value_name = "VALUE", conflicts_with = "no_rate_control")]
    pub quality: Option<u8>,

    /// Omit the rate-control flag and let the encoder use its default
    #[arg(long, default_value_t = false)]
    pub no_rate_control: bool,

    /// Optional: Replace the preset's speed setting (e.g. veryslow, or 0-5 for VP9)
    #[arg(long, value_name = "SPEED")]
    pub speed: Option<String>,

    /// Write job events as JSON lines on stdout instead of a progress bar
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FormatsArgs {
    /// Optional: Only list presets of this format
    #[arg(short = 'f', long, value_name = "FORMAT", value_parser = parse_format)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video to probe
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_PATH")]
    pub input: String,
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    value.parse().map_err(|e: vconvert_core::CoreError| e.to_string())
}

fn parse_resolution(value: &str) -> Result<Resolution, String> {
    value.parse().map_err(|e: vconvert_core::CoreError| e.to_string())
}

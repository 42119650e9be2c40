// vconvert-cli/src/main.rs
//
// Entry point for the vconvert binary: parses arguments, sets up logging,
// builds the converter configuration and dispatches to a command. Any error
// is printed once with its hint and the process exits with status 1.

use clap::Parser;
use std::process;
use vconvert_cli::{Cli, CliResult, Commands, logging, terminal};
use vconvert_cli::{run_check, run_convert, run_formats, run_probe};

fn run(cli: Cli) -> CliResult<()> {
    logging::setup_logging(cli.verbose, cli.log_dir.as_deref())?;

    let config = cli.converter_config()?;
    log::debug!("Using configuration: {:?}", config);

    match cli.command {
        Commands::Convert(args) => run_convert(config, args),
        Commands::Formats(args) => run_formats(args),
        Commands::Probe(args) => run_probe(config, args),
        Commands::Check => run_check(config),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::debug!("Command failed: {:?}", e);
        terminal::print_error(&e);
        process::exit(1);
    }
}

// vconvert-cli/src/lib.rs
//
// Library portion of the vconvert CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConvertArgs, FormatsArgs, ProbeArgs};
pub use commands::check::run_check;
pub use commands::convert::run_convert;
pub use commands::formats::run_formats;
pub use commands::probe::run_probe;
pub use error::{CliErrorContext, CliResult};

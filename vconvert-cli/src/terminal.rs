// ============================================================================
// vconvert-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Sections, Status Lines and the Progress Bar
//
// User-facing output goes to stdout; errors and the progress bar go to
// stderr so `convert --json` keeps stdout machine readable.

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use vconvert_core::{CoreError, ProgressSnapshot};

/// Bar length; positions are per-mille of the input duration.
const PROGRESS_SCALE: u64 = 1000;

const LABEL_WIDTH: usize = 12;

/// Print a section header
pub fn print_section(title: &str) {
    println!();
    println!("===== {} =====", style(title.to_uppercase()).cyan().bold());
    println!();
}

/// Print an aligned `label: value` line
pub fn print_status(label: &str, value: &str) {
    let padding = LABEL_WIDTH.saturating_sub(label.len()).max(1);
    println!("  {}:{}{}", label, " ".repeat(padding), style(value).bold());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!();
    println!("  {} {}", style("✓").green(), style(message).green());
}

/// Print an error and its hint to stderr
pub fn print_error(err: &CoreError) {
    eprintln!("{} {}", style("Error:").red().bold(), err);
    if let Some(hint) = err.hint() {
        eprintln!("  {} {}", style("Hint:").yellow(), hint);
    }
}

/// Progress bar for a running conversion.
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    pub fn new(total_secs: f64) -> Self {
        let bar = ProgressBar::new(PROGRESS_SCALE);
        let style = ProgressStyle::with_template(
            "{spinner:.green} Converting [{bar:30.cyan/blue}] {percent:>3}% {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.");
        bar.set_style(style);

        if !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        bar.set_message(ProgressSnapshot::new(0.0, total_secs).display());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    pub fn update(&self, snapshot: &ProgressSnapshot) {
        self.bar
            .set_position((snapshot.fraction() * PROGRESS_SCALE as f64) as u64);
        self.bar.set_message(snapshot.display());
    }

    /// Fills the bar and clears it.
    pub fn finish(&self) {
        self.bar.set_position(PROGRESS_SCALE);
        self.bar.finish_and_clear();
    }

    /// Leaves the bar at its last position.
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

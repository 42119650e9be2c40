// ============================================================================
// vconvert-core/src/progress.rs
// ============================================================================
//
// PROGRESS PARSING: ffmpeg Diagnostic Text to Normalized Progress
//
// ffmpeg reports its position as `time=HH:MM:SS.xx` on the stats line and the
// input length as `Duration: HH:MM:SS.cc` in the banner. Only those two
// markers are matched; a line without a marker is the common case, not an
// error.

use crate::utils::format_duration;
use once_cell::sync::Lazy;
use regex::Regex;

static ELAPSED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time=(\d{2,}):(\d{2}):(\d{2})\.\d+").expect("elapsed-time pattern is valid")
});

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duration: (\d{2,}):(\d{2}):(\d{2})\.(\d{2})").expect("duration pattern is valid")
});

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})(?:\.\d+)?$").expect("timestamp pattern is valid")
});

fn field(caps: &regex::Captures<'_>, index: usize) -> Option<u64> {
    caps.get(index)?.as_str().parse().ok()
}

/// Whole seconds of an `HH:MM:SS` clock held in capture groups 1 to 3.
/// `None` when the hour field does not fit.
fn clock_secs(caps: &regex::Captures<'_>) -> Option<u64> {
    field(caps, 1)?
        .checked_mul(3600)?
        .checked_add(field(caps, 2)? * 60)?
        .checked_add(field(caps, 3)?)
}

/// Whole seconds of the `time=` marker on one diagnostic line.
///
/// Fractional seconds are ignored. Returns `None` when the line carries no
/// marker, including ffmpeg's `time=N/A`.
#[must_use]
pub fn parse_elapsed(line: &str) -> Option<u64> {
    clock_secs(&ELAPSED_RE.captures(line)?)
}

/// Whole seconds of a bare `HH:MM:SS.xx` timestamp, as carried by parsed
/// progress records.
#[must_use]
pub fn parse_timestamp(timestamp: &str) -> Option<u64> {
    clock_secs(&TIMESTAMP_RE.captures(timestamp.trim())?)
}

/// Total seconds from the `Duration:` banner marker, centiseconds included.
///
/// Returns 0.0 when the marker is absent (for example a file ffmpeg cannot
/// read). Callers treat 0 as "duration unknown".
#[must_use]
pub fn parse_duration(output: &str) -> f64 {
    let Some(caps) = DURATION_RE.captures(output) else {
        return 0.0;
    };
    match (clock_secs(&caps), field(&caps, 4)) {
        (Some(secs), Some(cs)) => secs as f64 + cs as f64 / 100.0,
        _ => 0.0,
    }
}

/// Position of a running conversion relative to its input's length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub elapsed_secs: f64,
    pub total_secs: f64,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new(elapsed_secs: f64, total_secs: f64) -> Self {
        Self { elapsed_secs, total_secs }
    }

    /// Completed fraction in [0, 1]. Zero while the total is unknown.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total_secs <= 0.0 || !self.total_secs.is_finite() {
            return 0.0;
        }
        (self.elapsed_secs / self.total_secs).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Seconds of input left to process, never negative.
    #[must_use]
    pub fn eta_secs(&self) -> f64 {
        (self.total_secs - self.elapsed_secs).max(0.0)
    }

    #[must_use]
    pub fn elapsed_display(&self) -> String {
        format_duration(self.elapsed_secs)
    }

    #[must_use]
    pub fn total_display(&self) -> String {
        format_duration(self.total_secs)
    }

    #[must_use]
    pub fn eta_display(&self) -> String {
        format_duration(self.eta_secs())
    }

    /// `HH:MM:SS / HH:MM:SS (ETA: HH:MM:SS)`
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{} / {} (ETA: {})",
            self.elapsed_display(),
            self.total_display(),
            self.eta_display()
        )
    }
}

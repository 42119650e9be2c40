//! Run-time record of one conversion.

use crate::error::CoreError;
use crate::progress::ProgressSnapshot;
use crate::runner::JobEvent;

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

impl JobId {
    /// Allocates the next process-wide job id.
    #[must_use]
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        JobId(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Lifecycle state of a conversion job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Running,
    Succeeded,
    Failed { reason: String },
}

impl JobState {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self, JobState::Running)
    }
}

/// A conversion in progress or just finished.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub id: JobId,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Probed before the job starts; always positive.
    pub total_secs: f64,
    /// Latest `time=` position reported by ffmpeg.
    pub elapsed_secs: f64,
    pub state: JobState,
}

impl ConversionJob {
    #[must_use]
    pub fn new(input: PathBuf, output: PathBuf, total_secs: f64) -> Self {
        Self {
            id: JobId::next(),
            input,
            output,
            total_secs,
            elapsed_secs: 0.0,
            state: JobState::Running,
        }
    }

    /// Applies one worker event. Events after the terminal one are ignored.
    pub fn apply(&mut self, event: &JobEvent) {
        if self.state.is_finished() {
            log::debug!("{}: ignoring event after completion: {:?}", self.id, event);
            return;
        }

        match event {
            JobEvent::Progress { elapsed_secs, .. } => {
                self.elapsed_secs = *elapsed_secs as f64;
            }
            JobEvent::Completed { exit_code: 0 } => {
                self.elapsed_secs = self.total_secs;
                self.state = JobState::Succeeded;
            }
            JobEvent::Completed { exit_code } => {
                self.state = JobState::Failed {
                    reason: CoreError::ConversionFailed(*exit_code).to_string(),
                };
            }
            JobEvent::Failed { reason } => {
                self.state = JobState::Failed { reason: reason.clone() };
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(self.elapsed_secs, self.total_secs)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// User-facing summary once the job has finished.
    #[must_use]
    pub fn completion_message(&self) -> Option<String> {
        match &self.state {
            JobState::Running => None,
            JobState::Succeeded => Some(format!(
                "Video converted successfully! Saved to: {}",
                self.output.display()
            )),
            JobState::Failed { reason } => Some(reason.clone()),
        }
    }
}

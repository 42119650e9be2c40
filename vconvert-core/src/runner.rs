// ============================================================================
// vconvert-core/src/runner.rs
// ============================================================================
//
// JOB RUNNER: Probing and Running ffmpeg on a Worker Thread
//
// The worker is the only thread that blocks on process output. It never
// touches application state; everything it learns goes out as JobEvents on an
// ordered channel, ending with exactly one terminal event.

use crate::error::{CoreError, CoreResult, stream_read_error};
use crate::external::{TranscoderProcess, TranscoderSpawner, probe_arguments};
use crate::progress::{ProgressSnapshot, parse_duration, parse_elapsed, parse_timestamp};

use crossbeam_channel::{Receiver, Sender};
use ffmpeg_sidecar::event::FfmpegEvent;
use serde::Serialize;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Name given to the conversion worker thread.
pub const WORKER_THREAD_NAME: &str = "vconvert-worker";

/// Events sent from the worker to the foreground.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    /// A `time=` marker was seen on the diagnostic stream.
    Progress { elapsed_secs: u64, total_secs: f64 },
    /// The process exited. Nonzero codes are failures.
    Completed { exit_code: i32 },
    /// The process could not be started or its output could not be read.
    Failed { reason: String },
}

impl JobEvent {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress { .. })
    }

    /// Progress carried by the event, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        match self {
            JobEvent::Progress { elapsed_secs, total_secs } => {
                Some(ProgressSnapshot::new(*elapsed_secs as f64, *total_secs))
            }
            _ => None,
        }
    }
}

/// Runs a probe and returns the input duration in seconds, 0.0 when the
/// banner has no duration. Only a spawn failure is an error.
pub fn probe_duration<S>(spawner: &S, input: &Path) -> CoreResult<f64>
where
    S: TranscoderSpawner + ?Sized,
{
    let output = spawner.run_to_completion(&probe_arguments(input))?;
    let duration = parse_duration(&output);
    log::debug!("Probed duration of {}: {:.2}s", input.display(), duration);
    Ok(duration)
}

/// Runs one conversion to the end on the calling thread.
///
/// Progress events and then exactly one terminal event are sent on `events`.
/// The terminal event is also returned. A dropped receiver does not stop the
/// run; the diagnostic stream is still drained so ffmpeg never blocks on a
/// full pipe.
pub fn run_conversion<S>(
    spawner: &S,
    args: &[String],
    total_secs: f64,
    events: &Sender<JobEvent>,
) -> JobEvent
where
    S: TranscoderSpawner + ?Sized,
{
    let terminal = match drive(spawner, args, total_secs, events) {
        Ok(exit_code) => {
            if exit_code == 0 {
                log::info!("Conversion finished successfully");
            } else {
                log::warn!("Conversion exited with code {}", exit_code);
            }
            JobEvent::Completed { exit_code }
        }
        Err(e) => {
            log::error!("Conversion failed: {}", e);
            JobEvent::Failed { reason: e.to_string() }
        }
    };

    if events.send(terminal.clone()).is_err() {
        log::debug!("Event receiver dropped before the terminal event");
    }
    terminal
}

fn drive<S>(spawner: &S, args: &[String], total_secs: f64, events: &Sender<JobEvent>) -> CoreResult<i32>
where
    S: TranscoderSpawner + ?Sized,
{
    let mut process = spawner.spawn(args)?;
    let mut forwarder = ProgressForwarder::new(spawner.program(), total_secs, events);

    // The stream is consumed and closed here, before wait.
    if let Err(e) = process.handle_events(|event| forwarder.handle_event(event)) {
        if let Err(kill_err) = process.kill() {
            log::warn!("Failed to kill '{}': {}", spawner.program(), kill_err);
        }
        if let Err(wait_err) = process.wait() {
            log::warn!("Failed to reap '{}': {}", spawner.program(), wait_err);
        }
        return Err(e);
    }

    process.wait()
}

/// Turns ffmpeg events into progress events for one run.
struct ProgressForwarder<'a> {
    program: &'a str,
    total_secs: f64,
    events: &'a Sender<JobEvent>,
    receiver_gone: bool,
}

impl<'a> ProgressForwarder<'a> {
    fn new(program: &'a str, total_secs: f64, events: &'a Sender<JobEvent>) -> Self {
        Self {
            program,
            total_secs,
            events,
            receiver_gone: false,
        }
    }

    fn handle_event(&mut self, event: FfmpegEvent) -> CoreResult<()> {
        let elapsed = match event {
            FfmpegEvent::Progress(progress) => parse_timestamp(&progress.time),
            // Stats lines sidecar could not parse still carry `time=`.
            FfmpegEvent::Log(_, line) => {
                log::trace!("ffmpeg: {}", line);
                parse_elapsed(&line)
            }
            FfmpegEvent::Error(error) => {
                return Err(stream_read_error(self.program, io::Error::other(error)));
            }
            _ => None,
        };

        if let Some(elapsed_secs) = elapsed {
            self.send_progress(elapsed_secs);
        }
        Ok(())
    }

    fn send_progress(&mut self, elapsed_secs: u64) {
        if self.receiver_gone {
            return;
        }
        let event = JobEvent::Progress {
            elapsed_secs,
            total_secs: self.total_secs,
        };
        if self.events.send(event).is_err() {
            log::debug!("Event receiver dropped; draining remaining output");
            self.receiver_gone = true;
        }
    }
}

/// Starts [`run_conversion`] on a named worker thread.
///
/// Returns the receiving end of an unbounded channel and the worker handle,
/// which yields the terminal event when joined.
pub fn spawn_conversion<S>(
    spawner: Arc<S>,
    args: Vec<String>,
    total_secs: f64,
) -> CoreResult<(Receiver<JobEvent>, JoinHandle<JobEvent>)>
where
    S: TranscoderSpawner + 'static,
{
    let (sender, receiver) = crossbeam_channel::unbounded();
    let worker = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || run_conversion(spawner.as_ref(), &args, total_secs, &sender))
        .map_err(|e| CoreError::OperationFailed(format!("Failed to start worker thread: {e}")))?;
    Ok((receiver, worker))
}

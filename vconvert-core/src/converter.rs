// ============================================================================
// vconvert-core/src/converter.rs
// ============================================================================
//
// APPLICATION STATE: Selection, the Active Job and Event Handoff
//
// Converter is owned by the foreground thread. It holds the selected input
// and at most one active job; while a job is active every new start is
// rejected. Worker events are applied here, in order, and a terminal event
// joins the worker and clears the busy state.

use crate::catalog::OutputFormat;
use crate::config::ConverterConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{TranscoderSpawner, build_arguments};
use crate::job::{ConversionJob, JobId};
use crate::request::{ConversionRequest, default_output_path};
use crate::runner::{JobEvent, probe_duration, spawn_conversion};
use crate::utils::{normalize_dropped_path, validate_input};

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

const WORKER_LOST_REASON: &str = "Conversion worker stopped without reporting a result";

struct ActiveJob {
    job: ConversionJob,
    events: Receiver<JobEvent>,
    worker: Option<JoinHandle<JobEvent>>,
}

/// Conversion controller for one application instance.
pub struct Converter<S: TranscoderSpawner + 'static> {
    spawner: Arc<S>,
    config: ConverterConfig,
    selected_input: Option<PathBuf>,
    active: Option<ActiveJob>,
    last_job: Option<ConversionJob>,
}

impl<S: TranscoderSpawner + 'static> Converter<S> {
    #[must_use]
    pub fn new(spawner: S) -> Self {
        Self::with_config(spawner, ConverterConfig::default())
    }

    #[must_use]
    pub fn with_config(spawner: S, config: ConverterConfig) -> Self {
        Self {
            spawner: Arc::new(spawner),
            config,
            selected_input: None,
            active: None,
            last_job: None,
        }
    }

    #[must_use]
    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    // ---- Selection ----

    /// Selects an input file. An invalid path leaves the previous selection
    /// in place.
    pub fn select_input(&mut self, path: &Path) -> CoreResult<&Path> {
        let path = validate_input(path)?;
        log::info!("Selected input: {}", path.display());
        Ok(self.selected_input.insert(path).as_path())
    }

    /// Selects an input from raw drop-target text, unwrapping `{...}` or quotes.
    pub fn select_dropped(&mut self, raw: &str) -> CoreResult<&Path> {
        let path = normalize_dropped_path(raw);
        self.select_input(&path)
    }

    #[must_use]
    pub fn selected_input(&self) -> Option<&Path> {
        self.selected_input.as_deref()
    }

    // ---- Requests ----

    /// Builds a request for the selected input. Missing options fall back to
    /// the configured defaults and the `<stem>_converted.<ext>` output path.
    pub fn prepare_request(
        &self,
        output: Option<PathBuf>,
        format: Option<OutputFormat>,
        preset_name: Option<&str>,
    ) -> CoreResult<ConversionRequest> {
        let input = self.selected_input.as_deref().ok_or(CoreError::NoInputSelected)?;
        let format = format.unwrap_or(self.config.default_format);
        let output = output.unwrap_or_else(|| default_output_path(input, format));
        Ok(ConversionRequest::new(input, output, format, preset_name)?
            .with_resolution(self.config.default_resolution))
    }

    /// Probes an input's duration in seconds; 0.0 means unknown.
    pub fn probe(&self, input: &Path) -> CoreResult<f64> {
        probe_duration(self.spawner.as_ref(), input)
    }

    // ---- Job lifecycle ----

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn current_job(&self) -> Option<&ConversionJob> {
        self.active.as_ref().map(|active| &active.job)
    }

    /// The most recently finished job.
    #[must_use]
    pub fn last_job(&self) -> Option<&ConversionJob> {
        self.last_job.as_ref()
    }

    /// Probes the input and starts the conversion on a worker thread.
    ///
    /// Rejected while another job is active, and when the probe finds no
    /// duration. Nothing is spawned in either case.
    pub fn start(&mut self, request: ConversionRequest) -> CoreResult<JobId> {
        if self.is_busy() {
            return Err(CoreError::JobActive);
        }

        let total_secs = self.probe(&request.input)?;
        if total_secs <= 0.0 {
            log::warn!("No duration found for {}", request.input.display());
            return Err(CoreError::DurationUnknown(request.input.clone()));
        }

        let args = build_arguments(&request);
        let (events, worker) = spawn_conversion(Arc::clone(&self.spawner), args, total_secs)?;
        let job = ConversionJob::new(request.input, request.output, total_secs);
        let id = job.id;
        log::info!(
            "{}: converting {} -> {} ({} / {})",
            id,
            job.input.display(),
            job.output.display(),
            request.format,
            request.preset.name
        );

        self.active = Some(ActiveJob {
            job,
            events,
            worker: Some(worker),
        });
        Ok(id)
    }

    /// Applies every event already waiting, without blocking.
    pub fn poll(&mut self) -> Vec<JobEvent> {
        let mut applied = Vec::new();
        loop {
            let next = match self.active.as_ref() {
                Some(active) => active.events.try_recv(),
                None => break,
            };
            match next {
                Ok(event) => applied.push(self.apply(event)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    applied.push(self.apply(worker_lost()));
                }
            }
        }
        applied
    }

    /// Waits up to `timeout` for the next event and applies it.
    pub fn wait_event(&mut self, timeout: Duration) -> Option<JobEvent> {
        let next = self.active.as_ref()?.events.recv_timeout(timeout);
        match next {
            Ok(event) => Some(self.apply(event)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(self.apply(worker_lost())),
        }
    }

    /// Blocks until the active job finishes and returns it.
    pub fn wait_until_finished(&mut self) -> Option<&ConversionJob> {
        while let Some(active) = self.active.as_ref() {
            let event = active.events.recv().unwrap_or_else(|_| worker_lost());
            self.apply(event);
        }
        self.last_job.as_ref()
    }

    fn apply(&mut self, event: JobEvent) -> JobEvent {
        if let Some(active) = self.active.as_mut() {
            active.job.apply(&event);
            if event.is_terminal() {
                self.finish();
            }
        }
        event
    }

    fn finish(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        if let Some(worker) = active.worker.take() {
            if worker.join().is_err() {
                log::error!("{}: worker thread panicked", active.job.id);
            }
        }
        if let Some(message) = active.job.completion_message() {
            log::info!("{}: {}", active.job.id, message);
        }
        self.last_job = Some(active.job);
    }
}

fn worker_lost() -> JobEvent {
    JobEvent::Failed {
        reason: WORKER_LOST_REASON.to_string(),
    }
}

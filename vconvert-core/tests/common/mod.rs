//! Scripted transcoder used by the integration tests.
//!
//! Each `spawn` pops the next [`Script`] and plays it back: a stream of
//! ffmpeg events, an exit code, or a failure. Every call is recorded, and the
//! spawner tracks whether the last event stream was closed before `wait`.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use vconvert_core::error::{command_start_error, stream_read_error};
use vconvert_core::{CoreResult, TranscoderProcess, TranscoderSpawner};

/// What the next spawned process does.
#[derive(Debug, Clone)]
pub enum Script {
    /// Emits `events` and exits with `exit_code`.
    Run { events: Vec<FfmpegEvent>, exit_code: i32 },
    /// The program cannot be started.
    SpawnError,
    /// Emits `before`, then the stream reports an error.
    ReadError { before: Vec<FfmpegEvent> },
    /// The event stream cannot be opened at all.
    NoStream,
}

/// Splits stderr text on `\r` and `\n` into log events.
pub fn log_lines(stderr: &str) -> Vec<FfmpegEvent> {
    stderr
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(|line| FfmpegEvent::Log(LogLevel::Info, line.to_string()))
        .collect()
}

impl Script {
    pub fn run(stderr: &str, exit_code: i32) -> Self {
        Script::Run {
            events: log_lines(stderr),
            exit_code,
        }
    }

    pub fn read_error(stderr: &str) -> Self {
        Script::ReadError {
            before: log_lines(stderr),
        }
    }
}

#[derive(Default)]
struct StreamFlags {
    closed: AtomicBool,
    closed_before_wait: AtomicBool,
    waited: AtomicBool,
}

pub struct ScriptedSpawner {
    probe_output: Option<String>,
    scripts: Mutex<VecDeque<Script>>,
    probe_calls: Mutex<Vec<Vec<String>>>,
    spawn_calls: Mutex<Vec<Vec<String>>>,
    killed: Arc<AtomicBool>,
    stream: Mutex<Arc<StreamFlags>>,
}

impl ScriptedSpawner {
    /// Probes return `probe_output`; spawns follow `scripts` in order.
    pub fn new(probe_output: &str, scripts: Vec<Script>) -> Self {
        Self {
            probe_output: Some(probe_output.to_string()),
            scripts: Mutex::new(scripts.into()),
            probe_calls: Mutex::new(Vec::new()),
            spawn_calls: Mutex::new(Vec::new()),
            killed: Arc::new(AtomicBool::new(false)),
            stream: Mutex::new(Arc::new(StreamFlags::default())),
        }
    }

    /// A spawner whose probe cannot start the program.
    pub fn missing_program() -> Self {
        Self {
            probe_output: None,
            ..Self::new("", Vec::new())
        }
    }

    pub fn probe_calls(&self) -> Vec<Vec<String>> {
        self.probe_calls.lock().unwrap().clone()
    }

    pub fn spawn_calls(&self) -> Vec<Vec<String>> {
        self.spawn_calls.lock().unwrap().clone()
    }

    pub fn was_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    /// Whether the last process's event stream has been closed.
    pub fn stream_closed(&self) -> bool {
        self.stream.lock().unwrap().closed.load(Ordering::SeqCst)
    }

    /// Whether the last process was waited on, with its stream already closed.
    pub fn stream_closed_before_wait(&self) -> bool {
        let flags = self.stream.lock().unwrap();
        flags.waited.load(Ordering::SeqCst) && flags.closed_before_wait.load(Ordering::SeqCst)
    }
}

fn not_found() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "No such file or directory")
}

impl TranscoderSpawner for ScriptedSpawner {
    type Process = ScriptedProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<ScriptedProcess> {
        self.spawn_calls.lock().unwrap().push(args.to_vec());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::run("", 0));

        let flags = Arc::new(StreamFlags::default());
        *self.stream.lock().unwrap() = Arc::clone(&flags);

        let (events, fail_with, exit_code) = match script {
            Script::Run { events, exit_code } => (Some(events), None, exit_code),
            Script::SpawnError => return Err(command_start_error("ffmpeg", not_found())),
            Script::ReadError { mut before } => {
                before.push(FfmpegEvent::Error("pipe closed unexpectedly".to_string()));
                (Some(before), None, 1)
            }
            Script::NoStream => {
                flags.closed.store(true, Ordering::SeqCst);
                (None, Some("Missing child stderr"), 1)
            }
        };

        Ok(ScriptedProcess {
            stream: events.map(|events| ScriptedStream {
                events: events.into(),
                flags: Arc::clone(&flags),
            }),
            fail_with,
            exit_code,
            killed: Arc::clone(&self.killed),
            flags,
        })
    }

    fn run_to_completion(&self, args: &[String]) -> CoreResult<String> {
        self.probe_calls.lock().unwrap().push(args.to_vec());
        self.probe_output
            .clone()
            .ok_or_else(|| command_start_error("ffmpeg", not_found()))
    }

    fn program(&self) -> &str {
        "ffmpeg"
    }
}

/// Pending events of one process. Marks itself closed when dropped.
struct ScriptedStream {
    events: VecDeque<FfmpegEvent>,
    flags: Arc<StreamFlags>,
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.flags.closed.store(true, Ordering::SeqCst);
    }
}

pub struct ScriptedProcess {
    stream: Option<ScriptedStream>,
    fail_with: Option<&'static str>,
    exit_code: i32,
    killed: Arc<AtomicBool>,
    flags: Arc<StreamFlags>,
}

impl TranscoderProcess for ScriptedProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let Some(mut stream) = self.stream.take() else {
            let reason = self.fail_with.unwrap_or("event stream already taken");
            return Err(stream_read_error("ffmpeg", io::Error::other(reason)));
        };
        while let Some(event) = stream.events.pop_front() {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<i32> {
        let closed = self.flags.closed.load(Ordering::SeqCst);
        self.flags.closed_before_wait.store(closed, Ordering::SeqCst);
        self.flags.waited.store(true, Ordering::SeqCst);
        if self.killed.load(Ordering::SeqCst) {
            Ok(-1)
        } else {
            Ok(self.exit_code)
        }
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.killed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Creates an empty file named `name` in `dir` and returns its path.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"").unwrap();
    path
}

pub const BANNER: &str = "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'clip.mov':\n  \
    Duration: 00:02:00.00, start: 0.000000, bitrate: 1205 kb/s\n";

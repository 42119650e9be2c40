// ============================================================================
// vconvert-core/src/external/transcoder.rs
// ============================================================================
//
// SIDECAR TRANSCODER: ffmpeg-sidecar Implementation of the Spawner Traits
//
// Conversions run through ffmpeg-sidecar, which parses ffmpeg's stderr into
// FfmpegEvents (stats lines rewritten with carriage returns included). The
// probe only needs the raw banner text, so it runs through std::process.

use super::{TranscoderProcess, TranscoderSpawner};
use crate::error::{CoreResult, command_start_error, stream_read_error};

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Spawns the configured ffmpeg binary.
#[derive(Debug, Clone)]
pub struct SidecarTranscoder {
    program: PathBuf,
    name: String,
}

impl SidecarTranscoder {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program.display().to_string();
        Self { program, name }
    }
}

/// A running ffmpeg child process.
pub struct SidecarProcess {
    child: FfmpegChild,
    name: String,
}

impl TranscoderProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.child.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            stream_read_error(self.name.clone(), io::Error::other(e.to_string()))
        })?;
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<i32> {
        let status = self.child.wait()?;
        Ok(status.code().unwrap_or(-1))
    }

    fn kill(&mut self) -> CoreResult<()> {
        match self.child.kill() {
            Ok(()) => Ok(()),
            // Already exited.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl TranscoderSpawner for SidecarTranscoder {
    type Process = SidecarProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<SidecarProcess> {
        let mut cmd = FfmpegCommand::new_with_path(&self.program);
        cmd.args(args);
        log::debug!("Spawning: {:?}", cmd);
        let child = cmd
            .spawn()
            .map_err(|e| command_start_error(self.name.clone(), e))?;
        Ok(SidecarProcess {
            child,
            name: self.name.clone(),
        })
    }

    fn run_to_completion(&self, args: &[String]) -> CoreResult<String> {
        log::debug!("Running: {} {}", self.name, args.join(" "));
        let Output { status, stdout, stderr } = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| command_start_error(self.name.clone(), e))?;

        // The probe never writes an output file, so ffmpeg exits nonzero.
        log::debug!("'{}' exited with {}", self.name, status);
        let mut text = String::from_utf8_lossy(&stderr).into_owned();
        text.push_str(&String::from_utf8_lossy(&stdout));
        Ok(text)
    }

    fn program(&self) -> &str {
        &self.name
    }
}

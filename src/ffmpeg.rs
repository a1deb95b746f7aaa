use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::config::LogLevel;
use crate::error::{Error, Result};

const FFMPEG_EXECUTABLE: &str = "ffmpeg";
const AUDIO_BITRATE: &str = "32k";

/// Produces `output` from `input`, blocking until done.
pub trait Transcoder {
    fn transcode(&self, input: &Path, output: &Path, log_level: LogLevel) -> Result<()>;
}

/// Transcoder backed by the ffmpeg command line tool.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: String,
}

impl Ffmpeg {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn command(&self, input: &Path, output: &Path, log_level: LogLevel) -> Command {
        let mut ffmpeg = Command::new(&self.program);
        ffmpeg
            .arg("-loglevel")
            .arg(log_level.ffmpeg_verbosity().to_string())
            .arg("-i")
            .arg(input)
            .arg("-b:a")
            .arg(AUDIO_BITRATE)
            .arg(output);
        ffmpeg
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new(FFMPEG_EXECUTABLE)
    }
}

impl Transcoder for Ffmpeg {
    fn transcode(&self, input: &Path, output: &Path, log_level: LogLevel) -> Result<()> {
        let mut ffmpeg = self.command(input, output, log_level);
        debug!("Executing: {}", command_line(&ffmpeg));

        let status = ffmpeg.status().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(Error::ToolFailed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

pub(crate) fn command_line(command: &Command) -> String {
    format!(
        "{:?} {}",
        command.get_program(),
        command
            .get_args()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    )
}

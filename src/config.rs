use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

const USAGE: &str = "\
## Pre-requirement:
Install ffmpeg (with libx264) and exiftool (https://exiftool.org/install.html#Unix)

## Usage examples:
# Transform single video to MP4
$ mp4ify myvideo.3GP

# Transform all videos in a given folder to MP4 (-f to force transformation)
# current folder
$ mp4ify *
# specific folder
$ mp4ify any-file-under-this-folder/*

# Transform all videos from a folder and children to MP4
$ mp4ify -r /path/to/media";

/// Command line surface of the converter.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Transform videos to MP4 format", after_help = USAGE)]
pub struct Args {
    /// Files to transform
    #[arg(required = true)]
    pub input_files: Vec<PathBuf>,

    /// Perform a dry run (skip transformation)
    #[arg(short, long)]
    pub dryrun: bool,

    /// Force transformation even if output file exists
    #[arg(short, long)]
    pub force: bool,

    /// Log level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Output format
    #[arg(short, long)]
    pub output_format: Option<String>,

    /// Transform files in sub folders
    #[arg(short, long)]
    pub recursive: bool,

    /// Erase original if transformation was previously successful
    #[arg(short, long)]
    pub erase: bool,
}

impl Args {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            dry_run: self.dryrun,
            force: self.force,
            erase: self.erase,
            log_level: self.log_level,
            recursive: self.recursive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
}

impl LogLevel {
    /// Value for ffmpeg's `-loglevel`. ffmpeg's own info level is too chatty,
    /// so INFO shares the warning verbosity; use DEBUG to see everything.
    pub fn ffmpeg_verbosity(self) -> u8 {
        match self {
            LogLevel::Debug => 32,
            LogLevel::Info | LogLevel::Warning => 24,
            LogLevel::Error => 16,
        }
    }

    pub fn tracing_level(self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Options for one invocation. Fixed for the whole run and handed by value
/// to every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub dry_run: bool,
    pub force: bool,
    pub erase: bool,
    pub log_level: LogLevel,
    pub recursive: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            force: false,
            erase: false,
            log_level: LogLevel::Info,
            recursive: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn ffmpeg_verbosity_folds_info_into_warning() {
        assert_eq!(LogLevel::Debug.ffmpeg_verbosity(), 32);
        assert_eq!(LogLevel::Info.ffmpeg_verbosity(), 24);
        assert_eq!(LogLevel::Warning.ffmpeg_verbosity(), 24);
        assert_eq!(LogLevel::Error.ffmpeg_verbosity(), 16);
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["mp4ify", "clip.mov"]).unwrap();
        assert_eq!(args.input_files, vec![PathBuf::from("clip.mov")]);
        assert_eq!(args.run_config(), RunConfig::default());
        assert!(args.output_format.is_none());
    }

    #[test]
    fn short_flags() {
        let args = Args::try_parse_from([
            "mp4ify", "-d", "-f", "-e", "-r", "-l", "DEBUG", "-o", "mkv", "media",
        ])
        .unwrap();
        let config = args.run_config();
        assert!(config.dry_run && config.force && config.erase && config.recursive);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(args.output_format.as_deref(), Some("mkv"));
    }

    #[test]
    fn long_flags_and_warning_level() {
        let args = Args::try_parse_from([
            "mp4ify",
            "--dryrun",
            "--log-level",
            "WARNING",
            "a.avi",
            "b.vob",
        ])
        .unwrap();
        assert!(args.dryrun);
        assert_eq!(args.log_level, LogLevel::Warning);
        assert_eq!(args.input_files.len(), 2);
    }

    #[test]
    fn rejects_missing_inputs_and_unknown_levels() {
        assert!(Args::try_parse_from(["mp4ify"]).is_err());
        assert!(Args::try_parse_from(["mp4ify", "-l", "TRACE", "a.avi"]).is_err());
        assert!(Args::try_parse_from(["mp4ify", "-l", "debug", "a.avi"]).is_err());
    }
}

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("\"{}\" does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("Only one path supported in recursive mode. Supplied {0} paths")]
    RecursivePathCount(usize),

    #[error("Path supplied is not a directory: \"{}\"", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed with exit code: {status}")]
    ToolFailed { program: String, status: ExitStatus },

    #[error("exiftool did not update \"{}\"", .0.display())]
    TagsNotWritten(PathBuf),

    #[error("exiftool could not read metadata from \"{}\"", .0.display())]
    MetadataUnreadable(PathBuf),

    #[error("exiftool session closed before answering")]
    SessionClosed,

    #[error("Malformed exiftool XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

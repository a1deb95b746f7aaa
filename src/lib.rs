//! Batch conversion of legacy video containers to MP4.
//!
//! Files are transcoded one at a time by ffmpeg; date tags (`*Date*`) are
//! read from each source with exiftool and written onto the new MP4.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod exiftool;
pub mod ffmpeg;
pub mod formats;
pub mod lifecycle;
pub mod logging;

pub use config::{Args, LogLevel, RunConfig};
pub use dispatch::{discover, dispatch, run, Summary};
pub use error::{Error, Result};
pub use lifecycle::{convert_file, Outcome};

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::exiftool::MetadataTool;
use crate::ffmpeg::Transcoder;
use crate::formats::supported_input_format;
use crate::lifecycle::{convert_file, Outcome};

/// Resolve the command line paths into the files to look at.
///
/// Without `recursive` the paths are taken as given (the shell already
/// expanded any globs). With it, exactly one directory is expected and every
/// file below it is returned, whatever its extension.
pub fn discover(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    if !recursive {
        return Ok(inputs.to_vec());
    }

    let [root] = inputs else {
        return Err(Error::RecursivePathCount(inputs.len()));
    };
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.clone()));
    }

    info!(
        "Transforming files recursively from root directory: \"{}\"",
        root.display()
    );
    Ok(walk(root))
}

fn walk(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir() && entry.path().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// Tally of a dispatch run. Files with unsupported extensions are not counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub simulated: usize,
    pub skipped: usize,
    pub erased: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Converted => self.converted += 1,
            Outcome::Simulated => self.simulated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Erased => self.erased += 1,
        }
    }
}

/// Convert every supported file in order. A failing file is logged and the
/// run goes on with the next one.
pub fn dispatch<T, M>(files: &[PathBuf], config: RunConfig, transcoder: &T, metadata: &M) -> Summary
where
    T: Transcoder,
    M: MetadataTool,
{
    let mut summary = Summary::default();
    for file in files.iter().filter(|file| supported_input_format(file)) {
        match convert_file(file, config, transcoder, metadata) {
            Ok(outcome) => summary.record(outcome),
            Err(err) => {
                error!("{err}");
                summary.failed += 1;
            }
        }
    }
    debug!(?summary, "Dispatch finished");
    summary
}

/// Discover and dispatch in one go. A bad recursive setup is logged and
/// nothing is processed.
pub fn run<T, M>(inputs: &[PathBuf], config: RunConfig, transcoder: &T, metadata: &M) -> Summary
where
    T: Transcoder,
    M: MetadataTool,
{
    match discover(inputs, config.recursive) {
        Ok(files) => dispatch(&files, config, transcoder, metadata),
        Err(err) => {
            error!("{err}");
            Summary::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn flat_inputs_are_used_verbatim() {
        let inputs = vec![PathBuf::from("b.avi"), PathBuf::from("missing.txt")];
        assert_eq!(discover(&inputs, false).unwrap(), inputs);
    }

    #[test]
    fn recursive_requires_exactly_one_path() {
        assert!(matches!(
            discover(&[], true),
            Err(Error::RecursivePathCount(0))
        ));
        let two = [PathBuf::from("a"), PathBuf::from("b")];
        assert!(matches!(
            discover(&two, true),
            Err(Error::RecursivePathCount(2))
        ));
    }

    #[test]
    fn recursive_root_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.avi");
        fs::write(&file, b"avi").unwrap();

        assert!(matches!(
            discover(&[file], true),
            Err(Error::NotADirectory(_))
        ));
        assert!(matches!(
            discover(&[dir.path().join("nope")], true),
            Err(Error::NotADirectory(_))
        ));
    }

    #[test]
    fn walks_the_whole_tree() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2004").join("summer");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("top.mov"), b"").unwrap();
        fs::write(nested.join("deep.VOB"), b"").unwrap();
        fs::write(nested.join("notes.txt"), b"").unwrap();

        let mut found = discover(&[dir.path().to_path_buf()], true).unwrap();
        found.sort();
        let mut expected = vec![
            dir.path().join("top.mov"),
            nested.join("deep.VOB"),
            nested.join("notes.txt"),
        ];
        expected.sort();
        assert_eq!(found, expected);
    }
}

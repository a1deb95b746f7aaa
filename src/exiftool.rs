//! Date metadata transfer through exiftool.
//!
//! One exiftool process is kept open per converted file (`-stay_open`), fed
//! arguments line by line on stdin. Its answers end with a `{ready}` line.
//! Reads use the RDF/XML output (`-X`), whose element names carry the group
//! qualified tag names exiftool accepts back on writes.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

const EXIFTOOL_EXECUTABLE: &str = "exiftool";
const READY: &str = "{ready}";
const BACKUP_SUFFIX: &str = "_original";

static FILES_UPDATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) image files? updated").expect("summary pattern is valid")
});

/// Tag name to value, restricted to tags whose name contains `Date`.
pub type DateTags = BTreeMap<String, String>;

pub fn date_tags<I>(metadata: I) -> DateTags
where
    I: IntoIterator<Item = (String, String)>,
{
    metadata
        .into_iter()
        .filter(|(key, _)| key.contains("Date"))
        .collect()
}

/// Opens a metadata session. Sessions are released when dropped.
pub trait MetadataTool {
    type Session: MetadataSession;

    fn open_session(&self) -> Result<Self::Session>;
}

pub trait MetadataSession {
    fn read_date_tags(&mut self, path: &Path) -> Result<DateTags>;

    fn write_date_tags(&mut self, path: &Path, tags: &DateTags) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ExifTool {
    program: String,
}

impl ExifTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new(EXIFTOOL_EXECUTABLE)
    }
}

impl MetadataTool for ExifTool {
    type Session = ExifToolSession;

    fn open_session(&self) -> Result<ExifToolSession> {
        let mut command = Command::new(&self.program);
        command
            .args(["-stay_open", "True", "-@", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped());
        debug!("Executing: {}", crate::ffmpeg::command_line(&command));

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;
        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::SessionClosed);
        };

        Ok(ExifToolSession {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }
}

/// A running `exiftool -stay_open` process.
pub struct ExifToolSession {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ExifToolSession {
    fn execute<I, S>(&mut self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            writeln!(self.stdin, "{}", arg.as_ref())?;
        }
        writeln!(self.stdin, "-execute")?;
        self.stdin.flush()?;

        let mut output = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(Error::SessionClosed);
            }
            if let Some(rest) = line.trim_end().strip_suffix(READY) {
                output.push_str(rest);
                return Ok(output);
            }
            output.push_str(&line);
        }
    }
}

impl MetadataSession for ExifToolSession {
    fn read_date_tags(&mut self, path: &Path) -> Result<DateTags> {
        let xml = self.execute(["-X".to_string(), path.to_string_lossy().into_owned()])?;
        // exiftool reports unreadable files on stderr and describes nothing
        let properties =
            parse_rdf(&xml)?.ok_or_else(|| Error::MetadataUnreadable(path.to_path_buf()))?;
        Ok(date_tags(properties))
    }

    fn write_date_tags(&mut self, path: &Path, tags: &DateTags) -> Result<()> {
        let mut args = Vec::with_capacity(tags.len() + 1);
        for (key, value) in tags {
            // one argument per line on the -@ channel
            if value.contains('\n') {
                warn!("Not copying multi-line tag {key} to \"{}\"", path.display());
                continue;
            }
            args.push(format!("-{key}={value}"));
        }
        args.push(path.to_string_lossy().into_owned());

        let summary = self.execute(&args)?;
        if files_updated(&summary) == 0 {
            return Err(Error::TagsNotWritten(path.to_path_buf()));
        }
        Ok(())
    }
}

impl Drop for ExifToolSession {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "-stay_open\nFalse");
        let _ = self.stdin.flush();
        if let Err(error) = self.child.wait() {
            debug!(%error, "exiftool did not exit cleanly");
        }
    }
}

/// Property name/value pairs of the `rdf:Description` in `exiftool -X` output,
/// or `None` when there is no description at all. Structured properties
/// (bags, sequences) are skipped.
pub fn parse_rdf(xml: &str) -> Result<Option<Vec<(String, String)>>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut properties = Vec::new();
    let mut depth = 0usize;
    let mut described = false;
    let mut current: Option<String> = None;
    let mut value = String::new();

    loop {
        match reader.read_event(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                if depth == 2 {
                    described = true;
                } else if depth == 3 {
                    current = Some(String::from_utf8_lossy(e.name()).into_owned());
                    value.clear();
                } else if depth > 3 {
                    current = None;
                }
            }
            Event::Text(ref e) if depth == 3 && current.is_some() => {
                value.push_str(&e.unescape_and_decode(&reader)?);
            }
            Event::End(_) => {
                if depth == 3 {
                    if let Some(name) = current.take() {
                        properties.push((name, std::mem::take(&mut value)));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(described.then_some(properties))
}

fn files_updated(summary: &str) -> u32 {
    FILES_UPDATED
        .captures(summary)
        .and_then(|cap| cap[1].parse().ok())
        .unwrap_or(0)
}

/// exiftool keeps the pre-edit file as `<name>_original`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Drop exiftool's backup of `path`. Best effort: a missing backup is fine
/// and any other failure is only logged.
pub fn remove_backup(path: &Path) {
    let backup = backup_path(path);
    debug!("Removing exiftool renamed file \"{}\"", backup.display());
    match fs::remove_file(&backup) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => warn!(%error, "Could not remove \"{}\"", backup.display()),
    }
}

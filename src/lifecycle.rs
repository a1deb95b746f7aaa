use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::exiftool::{self, MetadataSession, MetadataTool};
use crate::ffmpeg::Transcoder;
use crate::formats::output_path;

/// What happened to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Transcoded and re-tagged.
    Converted,
    /// Dry run; nothing was written.
    Simulated,
    /// Output already present, nothing touched.
    Skipped,
    /// Output already present, input deleted (or would have been, on a dry run).
    Erased,
}

/// Convert one input file to MP4, carrying its date tags over.
///
/// Date tags are always read from the input first, even when the output
/// turns out to exist already. When the output exists, `force` wins over
/// `erase`. A dry run never creates or deletes anything.
pub fn convert_file<T, M>(
    input: &Path,
    config: RunConfig,
    transcoder: &T,
    metadata: &M,
) -> Result<Outcome>
where
    T: Transcoder,
    M: MetadataTool,
{
    let output = output_path(input);

    if config.dry_run {
        info!(
            "Simulating transformation of \"{}\" to \"{}\"",
            input.display(),
            output.display()
        );
    } else {
        info!(
            "Transforming \"{}\" to \"{}\"",
            input.display(),
            output.display()
        );
    }

    if !input.exists() {
        return Err(Error::MissingInput(input.to_path_buf()));
    }

    let mut session = metadata.open_session()?;
    let tags = session.read_date_tags(input)?;
    debug!("Detected date tags in \"{}\": {:?}", input.display(), tags);

    if output.exists() {
        if config.force {
            if config.dry_run {
                info!(
                    "\"{}\" already exists. Simulating deletion before transformation.",
                    output.display()
                );
            } else {
                info!(
                    "\"{}\" already exists. deleting before transformation.",
                    output.display()
                );
                fs::remove_file(&output)?;
            }
        } else if config.erase {
            if config.dry_run {
                info!(
                    "\"{}\" already transformed. Simulating deletion.",
                    input.display()
                );
            } else {
                info!("\"{}\" already transformed. Deleting.", input.display());
                fs::remove_file(input)?;
            }
            return Ok(Outcome::Erased);
        } else {
            warn!(
                "\"{}\" already exists. Skipping transformation.",
                output.display()
            );
            return Ok(Outcome::Skipped);
        }
    }

    if config.dry_run {
        return Ok(Outcome::Simulated);
    }

    transcoder.transcode(input, &output, config.log_level)?;

    if tags.is_empty() {
        debug!("No date tags to copy to \"{}\"", output.display());
    } else {
        session.write_date_tags(&output, &tags)?;
    }
    drop(session);
    exiftool::remove_backup(&output);

    info!("\"{}\" created", output.display());
    Ok(Outcome::Converted)
}

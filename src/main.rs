use clap::Parser;
use tracing::debug;

use mp4ify::exiftool::ExifTool;
use mp4ify::ffmpeg::Ffmpeg;
use mp4ify::{logging, Args};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.log_level)?;

    let config = args.run_config();
    debug!("Input file: {:?}", args.input_files);
    debug!("Output format: {:?}", args.output_format);
    debug!("Dry run: {}", config.dry_run);
    debug!("Log level: {:?}", config.log_level);
    debug!("Force transformation: {}", config.force);
    debug!("Recursive: {}", config.recursive);

    mp4ify::run(
        &args.input_files,
        config,
        &Ffmpeg::default(),
        &ExifTool::default(),
    );
    Ok(())
}

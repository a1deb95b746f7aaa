use crate::config::LogLevel;

/// Install the process-wide subscriber. Output mirrors `LEVEL message`
/// on stderr, without timestamps or module targets.
pub fn init(level: LogLevel) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level.tracing_level())
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(anyhow::Error::msg)
}

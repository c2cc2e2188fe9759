use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Builds the level filter: `RUST_LOG` when set, otherwise `default_level`.
pub fn make_filter(default_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log level '{default_level}'")),
    }
}

/// Initializes logging to `path`. Call once at startup.
///
/// The terminal belongs to the UI, so records only go to the file,
/// appended and without ANSI colors.
pub fn init_file_logging(path: &Path, default_level: &str) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(make_filter(default_level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))
}

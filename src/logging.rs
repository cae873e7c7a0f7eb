use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Initializes tracing to a log file under the config dir. The TUI owns
/// the terminal, so nothing may write to stdout or stderr.
pub fn init_logging() -> Result<()> {
    let log_dir = crate::config::config_dir();
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("dict-cli.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .compact()
        .init();

    Ok(())
}

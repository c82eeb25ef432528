use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where diagnostic output goes when no log file is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Stderr,
    /// The TUI owns the terminal; without a file nothing is logged
    Discard,
}

/// Build the level filter from the configured directive, falling back to `warn`
pub fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global tracing subscriber.
///
/// Only the config decides the level and destination. A second call is a no-op.
pub fn init_logging(level: &str, file: Option<&Path>, fallback: Fallback) -> std::io::Result<()> {
    let filter = level_filter(level);
    match (file, fallback) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        (None, Fallback::Stderr) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
        (None, Fallback::Discard) => {}
    }
    Ok(())
}

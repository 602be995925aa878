//! Log setup: human-readable events on stderr and an appended log file.

use std::path::Path;

use anyhow::{Context, Result};
use flatguard_lib::consts::LOG_FILENAME;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `debug`. The log file is appended to and
/// written synchronously, one event at a time.
pub fn init(log_dir: &Path, debug: bool) -> Result<()> {
  std::fs::create_dir_all(log_dir)
    .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

  let level = if debug { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  let appender = RollingFileAppender::builder()
    .rotation(Rotation::NEVER)
    .filename_prefix(LOG_FILENAME)
    .build(log_dir)
    .with_context(|| format!("Failed to open log file in {}", log_dir.display()))?;

  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr),
    )
    .with(
      tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(appender),
    )
    .try_init()
    .context("Failed to install log subscriber")
}

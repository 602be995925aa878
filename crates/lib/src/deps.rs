//! Presence checks for external programs.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{FLATPAK_BIN, NOTIFY_BIN};

#[derive(Debug, Error)]
pub enum DependencyError {
  #[error("required program '{program}' was not found on PATH")]
  Missing { program: String },
}

/// Programs found on `PATH`.
#[derive(Debug, Clone)]
pub struct Dependencies {
  pub flatpak: PathBuf,
  /// `None` if notifications cannot be delivered.
  pub notify_send: Option<PathBuf>,
}

/// Locate the external programs the agent uses.
///
/// `flatpak` is required. `notify-send` is optional since notifications are
/// best-effort; its absence is only logged.
///
/// # Errors
///
/// Returns [`DependencyError::Missing`] if `flatpak` is not installed.
pub fn check_dependencies() -> Result<Dependencies, DependencyError> {
  let flatpak = which::which(FLATPAK_BIN).map_err(|_| DependencyError::Missing {
    program: FLATPAK_BIN.to_string(),
  })?;
  debug!(path = %flatpak.display(), "found flatpak");

  let notify_send = match which::which(NOTIFY_BIN) {
    Ok(path) => Some(path),
    Err(_) => {
      warn!("{} not found, desktop notifications are disabled", NOTIFY_BIN);
      None
    }
  };

  Ok(Dependencies { flatpak, notify_send })
}

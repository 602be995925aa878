//! XDG base directories for flatguard.

use std::path::PathBuf;

use crate::consts::APP_NAME;

/// Returns the user's home directory
pub fn home_dir() -> PathBuf {
  std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default()
}

fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
  std::env::var_os(var)
    .filter(|v| !v.is_empty())
    .map(PathBuf::from)
    .unwrap_or_else(|| fallback.iter().fold(home_dir(), |p, part| p.join(part)))
}

/// Returns the directory for configuration files for the application
pub fn config_dir() -> PathBuf {
  xdg_dir("XDG_CONFIG_HOME", &[".config"]).join(APP_NAME)
}

/// Returns the directory for state files (logs, run lock) for the application
pub fn state_dir() -> PathBuf {
  xdg_dir("XDG_STATE_HOME", &[".local", "state"]).join(APP_NAME)
}

/// Default location of the configuration file.
pub fn config_file() -> PathBuf {
  config_dir().join("config.toml")
}

/// Default log directory.
pub fn log_dir() -> PathBuf {
  state_dir().join("logs")
}

//! Agent configuration.
//!
//! Settings come from an optional TOML file, then command line overrides.
//!
//! ```toml
//! check_outdated = true
//! ignored_sections = ["Application", "Runtime", "Instance", "Extra Data"]
//! log_dir = "/var/log/flatguard"
//! debug = false
//! scope = "user"
//! notify = true
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::DEFAULT_IGNORED_SECTIONS;
use crate::manifest::{IgnoreSet, ProtectedSectionError};
use crate::platform::paths;
use crate::pkg::Scope;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read config file {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid config file {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("invalid ignored_sections: {0}")]
  ProtectedSection(#[from] ProtectedSectionError),
}

/// On-disk representation; every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
  check_outdated: bool,
  ignored_sections: Vec<String>,
  log_dir: Option<PathBuf>,
  debug: bool,
  scope: Scope,
  notify: bool,
}

impl Default for ConfigFile {
  fn default() -> Self {
    Self {
      check_outdated: true,
      ignored_sections: DEFAULT_IGNORED_SECTIONS.iter().map(|s| s.to_string()).collect(),
      log_dir: None,
      debug: false,
      scope: Scope::default(),
      notify: true,
    }
  }
}

/// Resolved configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
  /// Run the outdated-instance pass after the update pass.
  pub check_outdated: bool,
  /// Sections left out of the permission comparison.
  pub ignore: IgnoreSet,
  /// Directory holding the log file. Created on startup if missing.
  pub log_dir: PathBuf,
  /// Log at debug level.
  pub debug: bool,
  /// Installation scope to operate on.
  pub scope: Scope,
  /// Send desktop notifications.
  pub notify: bool,
}

/// Command line settings that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub no_outdated: bool,
  pub log_dir: Option<PathBuf>,
  pub debug: bool,
  pub scope: Option<Scope>,
  pub no_notify: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      check_outdated: true,
      ignore: IgnoreSet::default(),
      log_dir: paths::log_dir(),
      debug: false,
      scope: Scope::default(),
      notify: true,
    }
  }
}

impl Config {
  /// Load configuration.
  ///
  /// An explicit path must exist. Without one, the default location
  /// (`$XDG_CONFIG_HOME/flatguard/config.toml`) is used if present and the
  /// built-in defaults otherwise.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if it asks
  /// to ignore a permission-carrying section.
  pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let path = match explicit {
      Some(p) if !p.exists() => return Err(ConfigError::NotFound { path: p.to_path_buf() }),
      Some(p) => p.to_path_buf(),
      None => {
        let default = paths::config_file();
        if !default.exists() {
          debug!(path = %default.display(), "no config file, using defaults");
          return Ok(Self::default());
        }
        default
      }
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
      path: path.clone(),
      source,
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
      path: path.clone(),
      source,
    })?;

    debug!(path = %path.display(), "loaded config file");
    Self::from_file(file)
  }

  /// Parse configuration from TOML text.
  pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
      path: PathBuf::from("<inline>"),
      source,
    })?;
    Self::from_file(file)
  }

  fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
    Ok(Self {
      check_outdated: file.check_outdated,
      ignore: IgnoreSet::new(file.ignored_sections)?,
      log_dir: file.log_dir.unwrap_or_else(paths::log_dir),
      debug: file.debug,
      scope: file.scope,
      notify: file.notify,
    })
  }

  /// Apply command line overrides.
  pub fn with_overrides(mut self, overrides: Overrides) -> Self {
    if overrides.no_outdated {
      self.check_outdated = false;
    }
    if let Some(dir) = overrides.log_dir {
      self.log_dir = dir;
    }
    if overrides.debug {
      self.debug = true;
    }
    if let Some(scope) = overrides.scope {
      self.scope = scope;
    }
    if overrides.no_notify {
      self.notify = false;
    }
    self
  }
}

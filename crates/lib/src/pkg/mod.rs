//! Package manager collaborator.
//!
//! The update and outdated passes only talk to the package manager through
//! the [`PackageManager`] trait. [`flatpak::FlatpakCli`] implements it on top
//! of the `flatpak` command line; tests substitute an in-memory fake.

pub mod exec;
pub mod flatpak;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use exec::CommandError;
pub use flatpak::FlatpakCli;

/// Installation scope to operate on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
  User,
  System,
  #[default]
  All,
}

impl Scope {
  /// The command line flag selecting this scope, if any.
  pub fn flag(self) -> Option<&'static str> {
    match self {
      Scope::User => Some("--user"),
      Scope::System => Some("--system"),
      Scope::All => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Scope::User => "user",
      Scope::System => "system",
      Scope::All => "all",
    }
  }
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Scope {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "user" => Ok(Scope::User),
      "system" => Ok(Scope::System),
      "all" => Ok(Scope::All),
      other => Err(format!("unknown scope '{}' (expected user, system or all)", other)),
    }
  }
}

/// An installed application with an available update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRecord {
  /// Reverse-domain application id, e.g. `org.gnome.Maps`.
  pub id: String,
  /// Remote the application is installed from.
  pub origin: String,
}

impl AppRecord {
  pub fn new(id: impl Into<String>, origin: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      origin: origin.into(),
    }
  }
}

/// One running application instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RunningInstance {
  pub app_id: String,
  pub commit: String,
}

impl RunningInstance {
  pub fn new(app_id: impl Into<String>, commit: impl Into<String>) -> Self {
    Self {
      app_id: app_id.into(),
      commit: commit.into(),
    }
  }
}

/// Which version of an application's manifest to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSource<'a> {
  Installed,
  Remote { origin: &'a str },
}

impl fmt::Display for ManifestSource<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestSource::Installed => f.write_str("installed"),
      ManifestSource::Remote { origin } => write!(f, "remote '{}'", origin),
    }
  }
}

/// Failure to retrieve a manifest or commit for one application.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("could not query {source_kind} manifest of {app_id}: {error}")]
  Query {
    app_id: String,
    source_kind: String,
    #[source]
    error: CommandError,
  },

  #[error("{source_kind} manifest of {app_id} is empty")]
  Empty { app_id: String, source_kind: String },

  #[error("could not query installed commit of {app_id}: {error}")]
  Commit {
    app_id: String,
    #[source]
    error: CommandError,
  },
}

/// Capabilities the agent needs from the package manager.
///
/// Implementations block until the underlying query or update finishes.
pub trait PackageManager {
  /// Applications with an available update.
  fn list_updatable(&self) -> Result<Vec<AppRecord>, CommandError>;

  /// Currently running application instances.
  fn list_running(&self) -> Result<Vec<RunningInstance>, CommandError>;

  /// Raw manifest text of `app_id` in the requested state.
  fn manifest(&self, app_id: &str, source: ManifestSource<'_>) -> Result<String, FetchError>;

  /// Commit identifier of the installed build of `app_id`.
  fn installed_commit(&self, app_id: &str) -> Result<String, FetchError>;

  /// Update exactly one application without prompting.
  fn apply_update(&self, app_id: &str) -> Result<(), CommandError>;
}

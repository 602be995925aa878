//! [`PackageManager`] backed by the `flatpak` command line.

use tracing::warn;

use super::exec::{self, CommandError};
use super::{AppRecord, FetchError, ManifestSource, PackageManager, RunningInstance, Scope};
use crate::consts::FLATPAK_BIN;

#[derive(Debug, Clone)]
pub struct FlatpakCli {
  program: String,
  scope: Scope,
}

impl FlatpakCli {
  pub fn new(scope: Scope) -> Self {
    Self {
      program: FLATPAK_BIN.to_string(),
      scope,
    }
  }

  /// Use a different executable than `flatpak` from `PATH`.
  pub fn with_program(mut self, program: impl Into<String>) -> Self {
    self.program = program.into();
    self
  }

  pub fn scope(&self) -> Scope {
    self.scope
  }

  fn run(&self, args: &[&str]) -> Result<String, CommandError> {
    exec::run(&self.program, args)
  }

  /// `<subcommand> [scope flag] <rest...>`
  fn scoped_args<'a>(&self, subcommand: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![subcommand];
    if let Some(flag) = self.scope.flag() {
      args.push(flag);
    }
    args.extend_from_slice(rest);
    args
  }
}

impl PackageManager for FlatpakCli {
  fn list_updatable(&self) -> Result<Vec<AppRecord>, CommandError> {
    let args = self.scoped_args("remote-ls", &["--updates", "--app", "--columns=application,origin"]);
    let out = self.run(&args)?;
    Ok(
      parse_rows(&out, 2)
        .into_iter()
        .map(|row| AppRecord::new(row[0], row[1]))
        .collect(),
    )
  }

  fn list_running(&self) -> Result<Vec<RunningInstance>, CommandError> {
    let out = self.run(&["ps", "--columns=application,commit"])?;
    Ok(
      parse_rows(&out, 2)
        .into_iter()
        .map(|row| RunningInstance::new(row[0], row[1]))
        .collect(),
    )
  }

  fn manifest(&self, app_id: &str, source: ManifestSource<'_>) -> Result<String, FetchError> {
    let args = match source {
      ManifestSource::Installed => self.scoped_args("info", &["--show-metadata", app_id]),
      ManifestSource::Remote { origin } => self.scoped_args("remote-info", &["--show-metadata", origin, app_id]),
    };

    let text = self.run(&args).map_err(|error| FetchError::Query {
      app_id: app_id.to_string(),
      source_kind: source.to_string(),
      error,
    })?;

    // An app only reaches this point because an update exists, so a remote
    // that returns nothing is broken rather than empty.
    if text.is_empty() && matches!(source, ManifestSource::Remote { .. }) {
      return Err(FetchError::Empty {
        app_id: app_id.to_string(),
        source_kind: source.to_string(),
      });
    }

    Ok(text)
  }

  fn installed_commit(&self, app_id: &str) -> Result<String, FetchError> {
    let args = self.scoped_args("info", &["--show-commit", app_id]);
    self.run(&args).map_err(|error| FetchError::Commit {
      app_id: app_id.to_string(),
      error,
    })
  }

  fn apply_update(&self, app_id: &str) -> Result<(), CommandError> {
    let args = self.scoped_args("update", &["--noninteractive", "--assumeyes", app_id]);
    self.run(&args).map(|_| ())
  }
}

/// Split tabular command output into rows of at least `columns` fields.
///
/// Blank lines are skipped silently, short rows with a warning.
fn parse_rows(output: &str, columns: usize) -> Vec<Vec<&str>> {
  output
    .lines()
    .filter(|line| !line.trim().is_empty())
    .filter_map(|line| {
      let fields: Vec<&str> = line.split_whitespace().collect();
      if fields.len() < columns {
        warn!(line = %line, expected = columns, "skipping malformed row");
        None
      } else {
        Some(fields)
      }
    })
    .collect()
}

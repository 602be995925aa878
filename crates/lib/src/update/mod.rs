//! Update orchestration.
//!
//! Walks every application with a pending update, compares the permissions
//! of the installed and remote versions, and either updates the application
//! or holds it back for review. Each application goes through
//!
//! ```text
//! FETCH_LOCAL -> FETCH_REMOTE -> NORMALIZE -> COMPARE -> AUTO_UPDATE | FLAG
//! ```
//!
//! and any fetch failure ends its cycle as SKIPPED. Applications are handled
//! one at a time; a failure for one never affects the next.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::consts::PERMISSION_CHANGE_TITLE;
use crate::detect::{ManifestChange, Verdict, compare};
use crate::manifest::{IgnoreSet, normalize};
use crate::notify::Notification;
use crate::pkg::{AppRecord, CommandError, FetchError, ManifestSource, PackageManager};

/// Options for the update pass.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
  /// Sections left out of the comparison.
  pub ignore: IgnoreSet,
  /// Compare and flag, but never invoke the update command.
  pub dry_run: bool,
  /// Restrict the pass to these application ids. Empty means all.
  pub only: Vec<String>,
}

/// Errors that abort the whole pass.
#[derive(Debug, Error)]
pub enum UpdateError {
  /// The list of pending updates could not be retrieved.
  #[error("failed to list available updates: {0}")]
  ListUpdates(#[source] CommandError),
}

/// An application held back because its permissions changed.
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedApp {
  #[serde(flatten)]
  pub app: AppRecord,
  pub change: ManifestChange,
}

/// An application whose cycle ended early, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct AppFailure {
  #[serde(flatten)]
  pub app: AppRecord,
  pub reason: String,
}

/// Result of one update pass.
#[derive(Debug, Default, Serialize)]
pub struct UpdateReport {
  /// Applications updated successfully.
  pub updated: Vec<String>,
  /// Applications that would have been updated in a dry run.
  pub would_update: Vec<String>,
  /// Applications whose update command failed.
  pub update_failed: Vec<AppFailure>,
  /// Applications held back for review, in processing order.
  pub flagged: Vec<FlaggedApp>,
  /// Applications skipped because a manifest could not be fetched.
  pub skipped: Vec<AppFailure>,
}

impl UpdateReport {
  pub fn flagged_ids(&self) -> impl Iterator<Item = &str> {
    self.flagged.iter().map(|f| f.app.id.as_str())
  }

  /// The permission-change notification, if anything was flagged.
  pub fn notification(&self) -> Option<Notification> {
    Notification::listing(PERMISSION_CHANGE_TITLE, self.flagged_ids())
  }

  /// Total number of applications that went through the pass.
  pub fn total(&self) -> usize {
    self.updated.len() + self.would_update.len() + self.update_failed.len() + self.flagged.len() + self.skipped.len()
  }

  fn record(&mut self, app: &AppRecord, outcome: AppOutcome) {
    match outcome {
      AppOutcome::Updated => self.updated.push(app.id.clone()),
      AppOutcome::WouldUpdate => self.would_update.push(app.id.clone()),
      AppOutcome::UpdateFailed(e) => self.update_failed.push(AppFailure {
        app: app.clone(),
        reason: e.to_string(),
      }),
      AppOutcome::Flagged(change) => self.flagged.push(FlaggedApp {
        app: app.clone(),
        change,
      }),
      AppOutcome::Skipped(e) => self.skipped.push(AppFailure {
        app: app.clone(),
        reason: e.to_string(),
      }),
    }
  }
}

/// Final state of a single application's cycle.
#[derive(Debug)]
pub enum AppOutcome {
  Updated,
  WouldUpdate,
  UpdateFailed(CommandError),
  Flagged(ManifestChange),
  Skipped(FetchError),
}

/// Fetch both manifests of `app`, normalize them and compare.
///
/// This is the decision half of a cycle and has no side effects on the
/// system.
///
/// # Errors
///
/// Returns the first [`FetchError`]; the caller must treat it as "do not
/// update".
pub fn check_app(pm: &dyn PackageManager, app: &AppRecord, ignore: &IgnoreSet) -> Result<Verdict, FetchError> {
  let installed = pm.manifest(&app.id, ManifestSource::Installed)?;
  let remote = pm.manifest(&app.id, ManifestSource::Remote { origin: &app.origin })?;

  let installed = normalize(&installed, ignore);
  let remote = normalize(&remote, ignore);
  debug!(
    app = %app.id,
    installed_lines = installed.len(),
    remote_lines = remote.len(),
    "normalized manifests"
  );

  Ok(compare(&installed, &remote))
}

/// Run one application's full cycle.
pub fn process_app(pm: &dyn PackageManager, app: &AppRecord, options: &UpdateOptions) -> AppOutcome {
  let verdict = match check_app(pm, app, &options.ignore) {
    Ok(verdict) => verdict,
    Err(e) => {
      warn!(app = %app.id, error = %e, "skipping application");
      return AppOutcome::Skipped(e);
    }
  };

  match verdict {
    Verdict::Changed(change) => {
      warn!(
        app = %app.id,
        origin = %app.origin,
        summary = %change.summary(),
        "permissions changed, update held for review"
      );
      for line in change.diff.lines() {
        info!(app = %app.id, "  {}", line);
      }
      AppOutcome::Flagged(change)
    }
    Verdict::Identical if options.dry_run => {
      info!(app = %app.id, "permissions unchanged, would update");
      AppOutcome::WouldUpdate
    }
    Verdict::Identical => {
      info!(app = %app.id, "permissions unchanged, updating");
      match pm.apply_update(&app.id) {
        Ok(()) => {
          info!(app = %app.id, "update succeeded");
          AppOutcome::Updated
        }
        Err(e) => {
          error!(app = %app.id, error = %e, "update failed");
          AppOutcome::UpdateFailed(e)
        }
      }
    }
  }
}

/// Run the update pass over every application with a pending update.
///
/// # Errors
///
/// Returns [`UpdateError::ListUpdates`] if the pending updates cannot be
/// listed. Per-application failures are recorded in the report instead.
pub fn run_update_pass(pm: &dyn PackageManager, options: &UpdateOptions) -> Result<UpdateReport, UpdateError> {
  let apps = pm.list_updatable().map_err(UpdateError::ListUpdates)?;
  let apps: Vec<AppRecord> = apps
    .into_iter()
    .filter(|app| options.only.is_empty() || options.only.contains(&app.id))
    .collect();

  info!(count = apps.len(), dry_run = options.dry_run, "starting update pass");

  let mut report = UpdateReport::default();
  for app in &apps {
    let outcome = process_app(pm, app, options);
    report.record(app, outcome);
  }

  info!(
    updated = report.updated.len(),
    would_update = report.would_update.len(),
    failed = report.update_failed.len(),
    flagged = report.flagged.len(),
    skipped = report.skipped.len(),
    "update pass finished"
  );

  Ok(report)
}

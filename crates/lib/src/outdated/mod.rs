//! Detection of running instances that are older than the installed build.
//!
//! After an update the previous build keeps running until the application is
//! restarted. This pass compares the commit of every running instance with
//! the installed commit and reports the applications that need a restart.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::OUTDATED_INSTANCE_TITLE;
use crate::notify::Notification;
use crate::pkg::{CommandError, PackageManager};
use crate::util::commit::CommitId;

#[derive(Debug, Error)]
pub enum OutdatedError {
  #[error("failed to list running instances: {0}")]
  ListRunning(#[source] CommandError),
}

/// A running application whose build is not the installed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutdatedApp {
  pub app_id: String,
  pub running_commit: String,
  pub installed_commit: String,
}

#[derive(Debug, Default, Serialize)]
pub struct OutdatedReport {
  /// Outdated applications, each listed once.
  pub outdated: Vec<OutdatedApp>,
  /// Applications whose installed commit could not be queried.
  pub unknown: Vec<String>,
  /// Number of distinct (application, commit) pairs examined.
  pub checked: usize,
}

impl OutdatedReport {
  pub fn outdated_ids(&self) -> impl Iterator<Item = &str> {
    self.outdated.iter().map(|o| o.app_id.as_str())
  }

  /// The outdated-instance notification, if anything is outdated.
  pub fn notification(&self) -> Option<Notification> {
    Notification::listing(OUTDATED_INSTANCE_TITLE, self.outdated_ids())
  }

  fn contains(&self, app_id: &str) -> bool {
    self.outdated.iter().any(|o| o.app_id == app_id)
  }
}

/// Compare every running instance against the installed commit.
///
/// Instances sharing an application and commit are examined once, and the
/// installed commit of each application is queried at most once.
///
/// # Errors
///
/// Returns [`OutdatedError::ListRunning`] if running instances cannot be
/// listed. A failed commit query only skips that application.
pub fn run_outdated_pass(pm: &dyn PackageManager) -> Result<OutdatedReport, OutdatedError> {
  let running = pm.list_running().map_err(OutdatedError::ListRunning)?;

  let pairs: BTreeSet<(String, CommitId)> = running
    .into_iter()
    .map(|i| (i.app_id, CommitId::new(i.commit)))
    .collect();

  info!(instances = pairs.len(), "checking running instances");

  let mut report = OutdatedReport {
    checked: pairs.len(),
    ..Default::default()
  };
  let mut installed: BTreeMap<String, Option<CommitId>> = BTreeMap::new();

  for (app_id, running_commit) in pairs {
    let installed_commit = installed
      .entry(app_id.clone())
      .or_insert_with(|| match pm.installed_commit(&app_id) {
        Ok(commit) => Some(CommitId::new(commit)),
        Err(e) => {
          warn!(app = %app_id, error = %e, "could not determine installed commit");
          None
        }
      });

    let Some(installed_commit) = installed_commit else {
      if !report.unknown.contains(&app_id) {
        report.unknown.push(app_id);
      }
      continue;
    };

    if running_commit.same_build(installed_commit) {
      debug!(app = %app_id, commit = %running_commit, "running instance is current");
      continue;
    }

    info!(
      app = %app_id,
      running = %running_commit,
      installed = %installed_commit,
      "running instance is outdated"
    );
    if !report.contains(&app_id) {
      report.outdated.push(OutdatedApp {
        app_id,
        running_commit: running_commit.short().to_string(),
        installed_commit: installed_commit.short().to_string(),
      });
    }
  }

  Ok(report)
}

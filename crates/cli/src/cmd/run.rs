//! Implementation of the `flatguard run` command.
//!
//! One full agent run: update pass, outdated-instance pass, notifications.

use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

use flatguard_lib::config::Config;
use flatguard_lib::deps::check_dependencies;
use flatguard_lib::notify::send_best_effort;
use flatguard_lib::outdated::{OutdatedReport, run_outdated_pass};
use flatguard_lib::platform::paths;
use flatguard_lib::run_lock::RunLock;
use flatguard_lib::update::{UpdateOptions, UpdateReport, run_update_pass};

use super::{notifier, package_manager};
use crate::output::{
  OutputFormat, format_duration, print_change, print_info, print_json, print_stat, print_success, print_warning,
};

#[derive(Serialize)]
struct RunSummary<'a> {
  dry_run: bool,
  update: &'a UpdateReport,
  outdated: Option<&'a OutdatedReport>,
}

/// Execute the run command.
///
/// Applications that were flagged, skipped, or failed to update do not make
/// the command fail; they are reported and logged.
///
/// # Errors
///
/// Returns an error if `flatpak` is missing, another run holds the lock, or
/// the pending updates cannot be listed.
pub fn cmd_run(config: &Config, dry_run: bool, only: Vec<String>, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let deps = check_dependencies()?;
  let _lock = RunLock::acquire(&paths::state_dir(), "flatguard run")?;

  let pm = package_manager(config, &deps);
  let notifier = notifier(config, &deps);

  let options = UpdateOptions {
    ignore: config.ignore.clone(),
    dry_run,
    only,
  };
  let report = run_update_pass(&pm, &options).context("Update pass failed")?;
  send_best_effort(notifier.as_ref(), report.notification().as_ref());

  let outdated = if config.check_outdated {
    match run_outdated_pass(&pm) {
      Ok(outdated) => {
        send_best_effort(notifier.as_ref(), outdated.notification().as_ref());
        Some(outdated)
      }
      Err(e) => {
        error!(error = %e, "outdated-instance check failed");
        None
      }
    }
  } else {
    None
  };

  info!(elapsed = %format_duration(start.elapsed()), "run finished");

  if output.is_json() {
    return print_json(&RunSummary {
      dry_run,
      update: &report,
      outdated: outdated.as_ref(),
    });
  }

  print_update_report(&report, dry_run);
  if let Some(outdated) = &outdated {
    print_outdated_summary(outdated);
  }
  println!();
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}

fn print_update_report(report: &UpdateReport, dry_run: bool) {
  if report.total() == 0 {
    print_success("No updates available.");
    return;
  }

  for id in &report.updated {
    print_success(&format!("Updated {}", id));
  }
  for id in &report.would_update {
    print_info(&format!("Would update {}", id));
  }
  for flagged in &report.flagged {
    print_warning(&format!(
      "Held back {} ({}): permissions changed, {}",
      flagged.app.id,
      flagged.app.origin,
      flagged.change.summary()
    ));
    print_change(&flagged.change);
  }
  for failure in &report.update_failed {
    print_warning(&format!("Update of {} failed: {}", failure.app.id, failure.reason));
  }
  for failure in &report.skipped {
    print_warning(&format!("Skipped {}: {}", failure.app.id, failure.reason));
  }

  println!();
  if dry_run {
    print_stat("Would update", &report.would_update.len().to_string());
  } else {
    print_stat("Updated", &report.updated.len().to_string());
  }
  print_stat("Held back", &report.flagged.len().to_string());
  print_stat("Failed", &report.update_failed.len().to_string());
  print_stat("Skipped", &report.skipped.len().to_string());
}

fn print_outdated_summary(report: &OutdatedReport) {
  for app in &report.outdated {
    print_warning(&format!(
      "{} is running build {}, installed is {}; restart it to use the update",
      app.app_id, app.running_commit, app.installed_commit
    ));
  }
}

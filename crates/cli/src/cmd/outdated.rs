//! Implementation of the `flatguard outdated` command.

use anyhow::{Context, Result};

use flatguard_lib::config::Config;
use flatguard_lib::deps::check_dependencies;
use flatguard_lib::notify::send_best_effort;
use flatguard_lib::outdated::run_outdated_pass;

use super::{notifier, package_manager};
use crate::output::{OutputFormat, print_json, print_stat, print_success, print_warning};

/// Report running instances older than the installed build and notify about
/// them.
pub fn cmd_outdated(config: &Config, output: OutputFormat) -> Result<()> {
  let deps = check_dependencies()?;
  let pm = package_manager(config, &deps);

  let report = run_outdated_pass(&pm).context("Failed to check running instances")?;
  send_best_effort(notifier(config, &deps).as_ref(), report.notification().as_ref());

  if output.is_json() {
    return print_json(&report);
  }

  if report.outdated.is_empty() {
    print_success("All running applications are up to date.");
  }
  for app in &report.outdated {
    print_warning(&format!(
      "{} is running build {}, installed is {}",
      app.app_id, app.running_commit, app.installed_commit
    ));
  }
  if !report.unknown.is_empty() {
    print_stat("Unknown", &report.unknown.join(", "));
  }
  print_stat("Checked", &report.checked.to_string());

  Ok(())
}

//! Implementation of the `flatguard check` command.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use flatguard_lib::config::Config;
use flatguard_lib::deps::check_dependencies;
use flatguard_lib::detect::Verdict;
use flatguard_lib::pkg::{AppRecord, PackageManager};
use flatguard_lib::update::check_app;

use super::{package_manager, verdict_exit_code};
use crate::output::{OutputFormat, print_change, print_json, print_success, print_warning};

#[derive(Serialize)]
struct CheckResult<'a> {
  #[serde(flatten)]
  app: &'a AppRecord,
  #[serde(flatten)]
  verdict: &'a Verdict,
}

/// Compare the installed and remote permissions of one application without
/// updating it.
///
/// Without `origin`, the application must have a pending update so that its
/// remote can be looked up.
pub fn cmd_check(config: &Config, app_id: &str, origin: Option<String>, output: OutputFormat) -> Result<ExitCode> {
  let deps = check_dependencies()?;
  let pm = package_manager(config, &deps);

  let origin = match origin {
    Some(origin) => origin,
    None => {
      let pending = pm.list_updatable().context("Failed to list available updates")?;
      match pending.into_iter().find(|app| app.id == app_id) {
        Some(app) => app.origin,
        None => bail!("{} has no pending update; pass --origin to check it anyway", app_id),
      }
    }
  };

  let app = AppRecord::new(app_id, origin);
  let verdict = check_app(&pm, &app, &config.ignore).with_context(|| format!("Failed to check {}", app_id))?;

  if output.is_json() {
    print_json(&CheckResult {
      app: &app,
      verdict: &verdict,
    })?;
  } else {
    print_verdict(&app.id, &verdict);
  }

  Ok(verdict_exit_code(&verdict))
}

pub(super) fn print_verdict(subject: &str, verdict: &Verdict) {
  match verdict {
    Verdict::Identical => print_success(&format!("{}: permissions unchanged", subject)),
    Verdict::Changed(change) => {
      print_warning(&format!("{}: permissions changed, {}", subject, change.summary()));
      print_change(change);
      println!();
      print!("{}", change.diff);
    }
  }
}

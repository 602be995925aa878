mod check;
mod diff;
mod outdated;
mod run;

pub use check::cmd_check;
pub use diff::cmd_diff;
pub use outdated::cmd_outdated;
pub use run::cmd_run;

use std::process::ExitCode;

use flatguard_lib::config::Config;
use flatguard_lib::deps::Dependencies;
use flatguard_lib::detect::Verdict;
use flatguard_lib::notify::{NotifySend, Notifier, Silent};
use flatguard_lib::pkg::FlatpakCli;

/// Exit status for a changed verdict from `check` and `diff`.
const EXIT_CHANGED: u8 = 2;

fn verdict_exit_code(verdict: &Verdict) -> ExitCode {
  if verdict.is_identical() {
    ExitCode::SUCCESS
  } else {
    ExitCode::from(EXIT_CHANGED)
  }
}

fn package_manager(config: &Config, deps: &Dependencies) -> FlatpakCli {
  FlatpakCli::new(config.scope).with_program(deps.flatpak.to_string_lossy())
}

fn notifier(config: &Config, deps: &Dependencies) -> Box<dyn Notifier> {
  match &deps.notify_send {
    Some(path) if config.notify => Box::new(NotifySend::with_program(path.to_string_lossy())),
    _ => Box::new(Silent),
  }
}

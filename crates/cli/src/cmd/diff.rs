//! Implementation of the `flatguard diff` command.
//!
//! Runs the normalizer and detector on two manifest files, without touching
//! the package manager.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use flatguard_lib::config::Config;
use flatguard_lib::detect::compare_texts;

use super::check::print_verdict;
use super::verdict_exit_code;
use crate::output::{OutputFormat, print_json};

pub fn cmd_diff(config: &Config, installed: &Path, remote: &Path, output: OutputFormat) -> Result<ExitCode> {
  let installed_text = std::fs::read_to_string(installed)
    .with_context(|| format!("Failed to read installed manifest: {}", installed.display()))?;
  let remote_text =
    std::fs::read_to_string(remote).with_context(|| format!("Failed to read remote manifest: {}", remote.display()))?;

  let verdict = compare_texts(&installed_text, &remote_text, &config.ignore);

  if output.is_json() {
    print_json(&verdict)?;
  } else {
    let subject = format!("{} -> {}", installed.display(), remote.display());
    print_verdict(&subject, &verdict);
  }

  Ok(verdict_exit_code(&verdict))
}

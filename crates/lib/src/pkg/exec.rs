//! Running external programs with typed results.
//!
//! Every collaborator call goes through [`run`], which turns spawn failures
//! and non-zero exits into [`CommandError`] values so callers branch on a
//! result instead of inspecting exit codes.

use std::ffi::OsStr;
use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Errors from running an external program.
#[derive(Debug, Error)]
pub enum CommandError {
  /// The program is not on `PATH`.
  #[error("program not found: {program}")]
  NotFound { program: String },

  /// The program could not be started.
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  /// The program ran and exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}{}", stderr_suffix(.stderr))]
  Failed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },
}

fn stderr_suffix(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(": {}", stderr)
  }
}

/// Run a program to completion and return its trimmed stdout.
///
/// The call blocks until the program exits; no timeout is applied.
pub fn run<I, S>(program: &str, args: I) -> Result<String, CommandError>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let args: Vec<S> = args.into_iter().collect();
  let cmd = display_cmd(program, &args);

  debug!(cmd = %cmd, "executing command");

  let output = Command::new(program).args(&args).output().map_err(|e| {
    if e.kind() == io::ErrorKind::NotFound {
      CommandError::NotFound {
        program: program.to_string(),
      }
    } else {
      CommandError::Spawn {
        program: program.to_string(),
        source: e,
      }
    }
  })?;

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }
    return Err(CommandError::Failed {
      cmd,
      code: output.status.code(),
      stderr,
    });
  }

  if !stdout.is_empty() {
    debug!(bytes = stdout.len(), "command output");
  }

  Ok(stdout)
}

fn display_cmd<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
  let mut cmd = program.to_string();
  for arg in args {
    cmd.push(' ');
    cmd.push_str(&arg.as_ref().to_string_lossy());
  }
  cmd
}

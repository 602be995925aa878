//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const HOME_ONLY: &str = "[Application]\nname=org.example.App\n\n[Context]\nfilesystems=home;\n";
pub const HOME_AND_NETWORK: &str = "[Application]\nname=org.example.App\n\n[Context]\nfilesystems=home;\nshared=network;\n";

/// Answers the queries flatguard makes from files under `$root`:
/// `updates`, `running`, `installed/<app>`, `remote/<app>` and
/// `commits/<app>`. Update requests are appended to `update-calls`.
const FAKE_FLATPAK: &str = r#"#!/bin/sh
root='@ROOT@'
for arg; do last=$arg; done
case "$1" in
  remote-ls) cat "$root/updates" ;;
  ps) cat "$root/running" ;;
  info)
    case "$*" in
      *--show-commit*) cat "$root/commits/$last" ;;
      *) cat "$root/installed/$last" ;;
    esac
    ;;
  remote-info) cat "$root/remote/$last" ;;
  update) echo "$last" >> "$root/update-calls" ;;
  *) echo "unexpected flatpak call: $*" >&2; exit 1 ;;
esac
"#;

const FAKE_NOTIFY_SEND: &str = r#"#!/bin/sh
printf '%s\n' "$@" >> '@ROOT@/notify-calls'
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the fake programs,
/// their canned answers and flatguard's state directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_file("flatpak/updates", "");
    env.write_file("flatpak/running", "");
    env.install_script("flatpak", FAKE_FLATPAK);
    env.install_script("notify-send", FAKE_NOTIFY_SEND);
    env
  }

  /// An application with a pending update from `flathub`.
  pub fn with_app(self, id: &str, installed: &str, remote: &str) -> Self {
    self.append_file("flatpak/updates", &format!("{}\tflathub\n", id));
    self.write_file(&format!("flatpak/installed/{}", id), installed);
    self.write_file(&format!("flatpak/remote/{}", id), remote);
    self
  }

  /// An application with a pending update whose remote cannot be reached.
  pub fn with_unreachable_remote(self, id: &str, installed: &str) -> Self {
    self.append_file("flatpak/updates", &format!("{}\tflathub\n", id));
    self.write_file(&format!("flatpak/installed/{}", id), installed);
    self
  }

  pub fn with_running(self, id: &str, commit: &str) -> Self {
    self.append_file("flatpak/running", &format!("{}\t{}\n", id, commit));
    self
  }

  pub fn with_commit(self, id: &str, commit: &str) -> Self {
    self.write_file(&format!("flatpak/commits/{}", id), &format!("{}\n", commit));
    self
  }

  pub fn without_notify_send(self) -> Self {
    std::fs::remove_file(self.bin_path().join("notify-send")).unwrap();
    self
  }

  /// Command for the flatguard binary with the fake programs first on `PATH`.
  pub fn flatguard_cmd(&self) -> Command {
    let path = format!("{}:/usr/bin:/bin", self.bin_path().display());
    let mut cmd = cargo_bin_cmd!("flatguard");
    cmd
      .env("PATH", path)
      .env("HOME", self.temp.path())
      .env("XDG_STATE_HOME", self.temp.path().join("state"))
      .env("XDG_CONFIG_HOME", self.temp.path().join("config"))
      .env_remove("RUST_LOG");
    cmd
  }

  /// Application ids passed to `flatpak update`, in call order.
  pub fn updates(&self) -> Vec<String> {
    self.read_lines("flatpak/update-calls")
  }

  /// Number of `notify-send` invocations.
  pub fn notification_count(&self) -> usize {
    self
      .read_lines("flatpak/notify-calls")
      .iter()
      .filter(|l| l.starts_with("--app-name="))
      .count()
  }

  /// Every argument passed to `notify-send`, one line each.
  pub fn notifications(&self) -> String {
    self.read_lines("flatpak/notify-calls").join("\n")
  }

  pub fn log_contents(&self) -> String {
    let path = self.temp.path().join("state/flatguard/logs/flatguard.log");
    std::fs::read_to_string(path).unwrap_or_default()
  }

  fn bin_path(&self) -> PathBuf {
    self.temp.path().join("bin")
  }

  fn root_path(&self) -> PathBuf {
    self.temp.path().join("flatpak")
  }

  fn install_script(&self, name: &str, template: &str) {
    let path = self.bin_path().join(name);
    let script = template.replace("@ROOT@", &self.root_path().display().to_string());
    write(&path, &script);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    write(&self.temp.path().join(relative_path), content);
  }

  fn append_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    let existing = std::fs::read_to_string(&path).unwrap_or_default();
    write(&path, &(existing + content));
  }

  fn read_lines(&self, relative_path: &str) -> Vec<String> {
    std::fs::read_to_string(self.temp.path().join(relative_path))
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }
}

fn write(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
}

//! `flatguard outdated` integration tests.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

const OLD: &str = "1111111111111111aaaa";
const NEW: &str = "2222222222222222bbbb";

#[test]
#[serial]
fn outdated_instance_is_listed_once() {
  let env = TestEnv::new()
    .with_running("org.example.Editor", OLD)
    .with_running("org.example.Editor", OLD)
    .with_running("org.example.Viewer", NEW)
    .with_commit("org.example.Editor", NEW)
    .with_commit("org.example.Viewer", NEW);

  env
    .flatguard_cmd()
    .arg("outdated")
    .assert()
    .success()
    .stdout(predicate::str::contains("org.example.Editor is running build 111111111111"))
    .stdout(predicate::str::contains("org.example.Viewer").not());

  assert_eq!(env.notification_count(), 1);
  assert_eq!(env.notifications().matches("org.example.Editor").count(), 1);
}

#[test]
#[serial]
fn current_instances_are_not_notified() {
  let env = TestEnv::new()
    .with_running("org.example.Viewer", NEW)
    .with_commit("org.example.Viewer", NEW);

  env
    .flatguard_cmd()
    .arg("outdated")
    .assert()
    .success()
    .stdout(predicate::str::contains("up to date"));

  assert_eq!(env.notification_count(), 0);
}

#[test]
#[serial]
fn json_output_lists_commits() {
  let env = TestEnv::new()
    .with_running("org.example.Editor", OLD)
    .with_commit("org.example.Editor", NEW);

  let output = env
    .flatguard_cmd()
    .args(["outdated", "--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["outdated"][0]["app_id"], "org.example.Editor");
  assert_eq!(json["outdated"][0]["installed_commit"], "222222222222");
  assert_eq!(json["checked"], 1);
}

//! The update and outdated passes driven by a package manager defined
//! outside the crate.

use std::cell::RefCell;
use std::collections::HashMap;

use flatguard_lib::outdated::run_outdated_pass;
use flatguard_lib::pkg::{AppRecord, CommandError, FetchError, ManifestSource, PackageManager, RunningInstance};
use flatguard_lib::update::{UpdateOptions, run_update_pass};

const CALM: &str = "[Context]\nshared=ipc;\n";
const GREEDY: &str = "[Context]\nshared=ipc;network;\n";

#[derive(Default)]
struct Catalog {
  apps: Vec<(AppRecord, &'static str, &'static str)>,
  running: Vec<RunningInstance>,
  commits: HashMap<String, String>,
  updated: RefCell<Vec<String>>,
}

impl Catalog {
  fn find(&self, app_id: &str) -> Option<&(AppRecord, &'static str, &'static str)> {
    self.apps.iter().find(|(app, _, _)| app.id == app_id)
  }
}

impl PackageManager for Catalog {
  fn list_updatable(&self) -> Result<Vec<AppRecord>, CommandError> {
    Ok(self.apps.iter().map(|(app, _, _)| app.clone()).collect())
  }

  fn list_running(&self) -> Result<Vec<RunningInstance>, CommandError> {
    Ok(self.running.clone())
  }

  fn manifest(&self, app_id: &str, source: ManifestSource<'_>) -> Result<String, FetchError> {
    let (_, installed, remote) = self.find(app_id).ok_or_else(|| FetchError::Empty {
      app_id: app_id.to_string(),
      source_kind: source.to_string(),
    })?;
    Ok(match source {
      ManifestSource::Installed => installed.to_string(),
      ManifestSource::Remote { .. } => remote.to_string(),
    })
  }

  fn installed_commit(&self, app_id: &str) -> Result<String, FetchError> {
    self.commits.get(app_id).cloned().ok_or_else(|| FetchError::Commit {
      app_id: app_id.to_string(),
      error: CommandError::NotFound {
        program: "flatpak".to_string(),
      },
    })
  }

  fn apply_update(&self, app_id: &str) -> Result<(), CommandError> {
    self.updated.borrow_mut().push(app_id.to_string());
    Ok(())
  }
}

#[test]
fn update_pass_holds_back_only_changed_apps() {
  let catalog = Catalog {
    apps: vec![
      (AppRecord::new("org.example.Calm", "flathub"), CALM, CALM),
      (AppRecord::new("org.example.Greedy", "flathub"), CALM, GREEDY),
    ],
    ..Default::default()
  };

  let report = run_update_pass(&catalog, &UpdateOptions::default()).unwrap();

  assert_eq!(*catalog.updated.borrow(), vec!["org.example.Calm"]);
  assert_eq!(report.flagged_ids().collect::<Vec<_>>(), vec!["org.example.Greedy"]);

  let notification = report.notification().unwrap();
  assert_eq!(notification.body, "org.example.Greedy");
}

#[test]
fn outdated_pass_reports_restart_candidates() {
  let catalog = Catalog {
    running: vec![
      RunningInstance::new("org.example.Calm", "aaaaaaaaaaaaaaaa"),
      RunningInstance::new("org.example.Calm", "aaaaaaaaaaaaaaaa"),
    ],
    commits: HashMap::from([("org.example.Calm".to_string(), "bbbbbbbbbbbbbbbb".to_string())]),
    ..Default::default()
  };

  let report = run_outdated_pass(&catalog).unwrap();

  assert_eq!(report.outdated_ids().collect::<Vec<_>>(), vec!["org.example.Calm"]);
  assert_eq!(report.notification().unwrap().body, "org.example.Calm");
}

//! Permission-change detection on realistic Flatpak metadata.

use flatguard_lib::detect::{Verdict, compare_texts};
use flatguard_lib::manifest::{IgnoreSet, normalize};

const INSTALLED: &str = r#"[Application]
name=org.gnome.Maps
runtime=org.gnome.Platform/x86_64/46
sdk=org.gnome.Sdk/x86_64/46
command=gnome-maps

[Context]
shared=network;ipc;
sockets=x11;wayland;
devices=dri;
filesystems=xdg-run/pipewire-0;

[Session Bus Policy]
org.freedesktop.secrets=talk

[System Bus Policy]
org.freedesktop.GeoClue2=talk

[Instance]
instance-id=123456
"#;

fn with_context_line(line: &str) -> String {
  INSTALLED.replace("[Context]\n", &format!("[Context]\n{}\n", line))
}

mod identical {
  use super::*;

  #[test]
  fn runtime_bump_is_not_a_permission_change() {
    let remote = INSTALLED.replace("x86_64/46", "x86_64/47");
    assert_eq!(compare_texts(INSTALLED, &remote, &IgnoreSet::default()), Verdict::Identical);
  }

  #[test]
  fn section_order_is_irrelevant() {
    let mut sections: Vec<&str> = INSTALLED.split("\n\n").collect();
    sections.reverse();
    let remote = sections.join("\n\n");

    assert_eq!(compare_texts(INSTALLED, &remote, &IgnoreSet::default()), Verdict::Identical);
  }

  #[test]
  fn whitespace_is_irrelevant() {
    let remote = INSTALLED.replace("devices=dri;", "   devices=dri;   \n\n");
    assert_eq!(compare_texts(INSTALLED, &remote, &IgnoreSet::default()), Verdict::Identical);
  }

  #[test]
  fn instance_data_is_ignored() {
    let remote = INSTALLED.replace("instance-id=123456", "instance-id=654321");
    assert_eq!(compare_texts(INSTALLED, &remote, &IgnoreSet::default()), Verdict::Identical);
  }
}

mod changed {
  use super::*;

  #[test]
  fn new_filesystem_grant() {
    let remote = with_context_line("filesystems=home;");

    let verdict = compare_texts(INSTALLED, &remote, &IgnoreSet::default());
    let change = verdict.change().expect("expected a change");

    assert!(change.added.iter().any(|l| l.contains("filesystems=home;")));
    assert!(change.removed.is_empty());
  }

  #[test]
  fn dropped_permission_is_also_flagged() {
    let remote = INSTALLED.replace("devices=dri;\n", "");

    let verdict = compare_texts(INSTALLED, &remote, &IgnoreSet::default());
    let change = verdict.change().expect("expected a change");

    assert_eq!(change.removed, vec!["Context devices=dri;".to_string()]);
  }

  #[test]
  fn new_bus_name_is_flagged() {
    let remote = INSTALLED.replace(
      "org.freedesktop.secrets=talk",
      "org.freedesktop.secrets=talk\norg.freedesktop.Flatpak=talk",
    );

    assert!(!compare_texts(INSTALLED, &remote, &IgnoreSet::default()).is_identical());
  }

  #[test]
  fn new_policy_section_is_flagged() {
    let remote = format!("{}\n[Policy Tracker3]\ndbus-access=read\n", INSTALLED);
    assert!(!compare_texts(INSTALLED, &remote, &IgnoreSet::default()).is_identical());
  }

  #[test]
  fn application_section_counts_when_not_ignored() {
    let remote = INSTALLED.replace("x86_64/46", "x86_64/47");
    assert!(!compare_texts(INSTALLED, &remote, &IgnoreSet::empty()).is_identical());
  }
}

mod canonical_form {
  use super::*;

  #[test]
  fn lines_are_sorted_and_prefixed() {
    let canonical = normalize(INSTALLED, &IgnoreSet::default());
    let lines = canonical.lines();

    assert!(lines.windows(2).all(|w| w[0] <= w[1]));
    assert!(lines.contains(&"System Bus Policy org.freedesktop.GeoClue2=talk".to_string()));
    assert!(!lines.iter().any(|l| l.starts_with("Application ")));
  }

  #[test]
  fn permission_sections_cannot_be_ignored() {
    for section in ["Context", "Session Bus Policy", "System Bus Policy", "Policy Tracker3"] {
      assert!(IgnoreSet::new([section]).is_err(), "{} should be rejected", section);
    }
  }
}

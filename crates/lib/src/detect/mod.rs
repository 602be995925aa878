//! Permission-change detection.
//!
//! Compares the canonical forms of the installed and remote manifests of one
//! application. Anything other than an exact match is reported as a change.

use serde::Serialize;
use similar::TextDiff;

use crate::manifest::{CanonicalManifest, IgnoreSet, normalize};

/// Outcome of comparing two canonical manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
  Identical,
  Changed(ManifestChange),
}

impl Verdict {
  pub fn is_identical(&self) -> bool {
    matches!(self, Verdict::Identical)
  }

  pub fn change(&self) -> Option<&ManifestChange> {
    match self {
      Verdict::Identical => None,
      Verdict::Changed(change) => Some(change),
    }
  }
}

/// What differs between the installed and the remote manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestChange {
  /// Canonical lines only present in the remote manifest.
  pub added: Vec<String>,
  /// Canonical lines only present in the installed manifest.
  pub removed: Vec<String>,
  /// Unified line diff of the two canonical forms.
  pub diff: String,
}

impl ManifestChange {
  /// One-line summary suitable for a log message.
  pub fn summary(&self) -> String {
    format!("{} added, {} removed", self.added.len(), self.removed.len())
  }
}

/// Compare two canonical manifests.
pub fn compare(installed: &CanonicalManifest, remote: &CanonicalManifest) -> Verdict {
  let old = significant_lines(installed);
  let new = significant_lines(remote);

  if old == new {
    return Verdict::Identical;
  }

  let added = new.iter().filter(|l| !old.contains(l)).map(|l| l.to_string()).collect();
  let removed = old.iter().filter(|l| !new.contains(l)).map(|l| l.to_string()).collect();

  Verdict::Changed(ManifestChange {
    added,
    removed,
    diff: unified_diff(&old, &new),
  })
}

/// Normalize two raw manifests with the same ignore-set and compare them.
pub fn compare_texts(installed: &str, remote: &str, ignore: &IgnoreSet) -> Verdict {
  compare(&normalize(installed, ignore), &normalize(remote, ignore))
}

fn significant_lines(manifest: &CanonicalManifest) -> Vec<&str> {
  manifest
    .lines()
    .iter()
    .map(|l| l.trim())
    .filter(|l| !l.is_empty())
    .collect()
}

fn unified_diff(old: &[&str], new: &[&str]) -> String {
  let old_text = joined(old);
  let new_text = joined(new);

  TextDiff::from_lines(&old_text, &new_text)
    .unified_diff()
    .context_radius(3)
    .header("installed", "remote")
    .to_string()
}

fn joined(lines: &[&str]) -> String {
  let mut text = String::new();
  for line in lines {
    text.push_str(line);
    text.push('\n');
  }
  text
}

//! Canonical, order-independent form of a manifest.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::parse::Manifest;
use crate::consts::{DEFAULT_IGNORED_SECTIONS, PROTECTED_SECTION_PREFIX, PROTECTED_SECTIONS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("section '{0}' carries sandbox permissions and cannot be ignored")]
pub struct ProtectedSectionError(pub String);

/// Returns true if a section of this name may hold permission grants.
pub fn is_protected_section(name: &str) -> bool {
  PROTECTED_SECTIONS.contains(&name) || name.starts_with(PROTECTED_SECTION_PREFIX)
}

/// Section names dropped before comparison.
///
/// Matching is exact and case-sensitive. Construction rejects any name that
/// [`is_protected_section`] reports, so an ignore-set can never hide a
/// permission change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoreSet(BTreeSet<String>);

impl IgnoreSet {
  pub fn new<I, S>(names: I) -> Result<Self, ProtectedSectionError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut set = BTreeSet::new();
    for name in names {
      let name = name.into();
      if is_protected_section(&name) {
        return Err(ProtectedSectionError(name));
      }
      set.insert(name);
    }
    Ok(Self(set))
  }

  /// An ignore-set that keeps every section.
  pub fn empty() -> Self {
    Self(BTreeSet::new())
  }

  pub fn contains(&self, section: &str) -> bool {
    self.0.contains(section)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }
}

impl Default for IgnoreSet {
  fn default() -> Self {
    Self(DEFAULT_IGNORED_SECTIONS.iter().map(|s| s.to_string()).collect())
  }
}

/// Sorted `"<section> <entry>"` lines with ignored sections removed.
///
/// Section boundaries survive only as the prefix of each line. Duplicate
/// lines collapse, so two manifests that hold the same entries as sets have
/// equal canonical forms regardless of source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CanonicalManifest(Vec<String>);

impl CanonicalManifest {
  pub fn from_manifest(manifest: &Manifest, ignore: &IgnoreSet) -> Self {
    Self::from_lines(
      manifest
        .entries()
        .filter(|(section, _)| !ignore.contains(section))
        .map(|(section, entry)| format!("{} {}", section, entry)),
    )
  }

  /// Canonicalize already flattened lines.
  ///
  /// Blank lines are dropped and the rest are sorted and de-duplicated.
  /// Applying this to the lines of a canonical manifest returns it unchanged.
  pub fn from_lines<I, S>(lines: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let set: BTreeSet<String> = lines
      .into_iter()
      .map(|l| l.as_ref().trim().to_string())
      .filter(|l| !l.is_empty())
      .collect();
    Self(set.into_iter().collect())
  }

  pub fn lines(&self) -> &[String] {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }
}

impl fmt::Display for CanonicalManifest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for line in &self.0 {
      writeln!(f, "{}", line)?;
    }
    Ok(())
  }
}

/// Parse, filter and canonicalize raw manifest text in one step.
pub fn normalize(text: &str, ignore: &IgnoreSet) -> CanonicalManifest {
  CanonicalManifest::from_manifest(&Manifest::parse(text), ignore)
}

//! Commit identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::COMMIT_PREFIX_LEN;

/// A content-addressed commit identifier as reported by the package manager.
///
/// Full identifiers are 64 hex characters; comparisons only look at the
/// first [`COMMIT_PREFIX_LEN`] so abbreviated ids from different commands
/// still match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommitId(pub String);

impl CommitId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into().trim().to_string())
  }

  /// The comparison prefix of this commit.
  pub fn short(&self) -> &str {
    truncate_commit(&self.0)
  }

  /// Whether two identifiers name the same build.
  pub fn same_build(&self, other: &CommitId) -> bool {
    self.short() == other.short()
  }
}

impl fmt::Display for CommitId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// The first [`COMMIT_PREFIX_LEN`] characters of `commit`.
pub fn truncate_commit(commit: &str) -> &str {
  match commit.char_indices().nth(COMMIT_PREFIX_LEN) {
    Some((idx, _)) => &commit[..idx],
    None => commit,
  }
}

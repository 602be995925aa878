//! Parser for the grouped key-value manifest format.

use serde::Serialize;

/// A named group of entries inside a manifest.
///
/// Entries are kept verbatim apart from surrounding whitespace; the parser
/// does not split them into key and value because the comparison is done on
/// whole lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
  pub name: String,
  pub entries: Vec<String>,
}

impl Section {
  fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      entries: Vec::new(),
    }
  }
}

/// A parsed manifest: sections in source order.
///
/// Lines that appear before the first section header are collected in a
/// section with an empty name so they still take part in comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
  pub sections: Vec<Section>,
}

impl Manifest {
  /// Parse manifest text.
  ///
  /// Parsing never fails: a line of the form `[Name]` opens a section, every
  /// other non-blank line belongs to the section opened last. A section
  /// header that appears twice produces two [`Section`] values.
  pub fn parse(text: &str) -> Self {
    let mut sections: Vec<Section> = Vec::new();

    for raw in text.lines() {
      let line = raw.trim();
      if line.is_empty() {
        continue;
      }

      if let Some(name) = section_header(line) {
        sections.push(Section::new(name));
        continue;
      }

      match sections.last_mut() {
        Some(section) => section.entries.push(line.to_string()),
        None => {
          let mut preamble = Section::new("");
          preamble.entries.push(line.to_string());
          sections.push(preamble);
        }
      }
    }

    Self { sections }
  }

  /// Look up the first section with the given name.
  pub fn section(&self, name: &str) -> Option<&Section> {
    self.sections.iter().find(|s| s.name == name)
  }

  /// Iterate over `(section name, entry)` pairs in source order.
  pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .sections
      .iter()
      .flat_map(|s| s.entries.iter().map(move |e| (s.name.as_str(), e.as_str())))
  }

  pub fn is_empty(&self) -> bool {
    self.sections.iter().all(|s| s.entries.is_empty())
  }
}

/// Returns the section name if `line` is a `[Name]` header.
fn section_header(line: &str) -> Option<&str> {
  line.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}

//! Module descriptor parsing and serialization
//!
//! A descriptor is a small text record: `Key: value` metadata lines, an
//! optional `Depends:` line of comma-separated token groups, and a file list
//! of plain relative paths. Metadata keeps first-seen insertion order so
//! serialized descriptors are deterministic and diff-friendly.

use crate::core::error::{ResultExt, ShipResult};
use std::fs;
use std::path::Path;

/// A module's metadata block, dependency list, and ordered file list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
  /// Lower-cased key → raw value, in first-seen insertion order
  metadata: Vec<(String, String)>,

  /// Dependency token groups, e.g. `[["pkga", ">=1.0"], ["pkgb"]]`
  pub dependencies: Vec<Vec<String>>,

  /// Relative paths, in declaration order (drives deployment order)
  pub files: Vec<String>,
}

impl ModuleDescriptor {
  /// Parse a descriptor from its text form
  ///
  /// Lines with a colon are metadata (`depends` is split into token groups),
  /// lines without one are file entries; blank lines are ignored everywhere.
  pub fn parse(text: &str) -> Self {
    let mut descriptor = ModuleDescriptor::default();

    for line in text.lines() {
      if let Some((raw_key, raw_value)) = line.split_once(':') {
        let key = raw_key.trim().to_lowercase();
        let value = raw_value.trim();
        if key == "depends" {
          descriptor.dependencies = value
            .split(',')
            .map(|group| group.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|group| !group.is_empty())
            .collect();
        } else {
          descriptor.set(&key, value);
        }
      } else {
        let entry = line.trim();
        if !entry.is_empty() {
          descriptor.files.push(entry.to_string());
        }
      }
    }

    descriptor
  }

  /// Read and parse a descriptor file
  pub fn load(path: &Path) -> ShipResult<Self> {
    let text =
      fs::read_to_string(path).with_context(|| format!("Failed to read module descriptor {}", path.display()))?;
    Ok(Self::parse(&text))
  }

  /// Serialize and write a descriptor file
  pub fn store(&self, path: &Path, include_files: bool) -> ShipResult<()> {
    fs::write(path, self.serialize(include_files))
      .with_context(|| format!("Failed to write module descriptor {}", path.display()))?;
    Ok(())
  }

  /// Whether a metadata key is present
  pub fn has(&self, key: &str) -> bool {
    self.get(key).is_some()
  }

  /// Metadata lookup; `None` is distinct from an empty value
  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .metadata
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  /// Upsert a metadata entry, preserving its first-seen position
  pub fn set(&mut self, key: &str, value: &str) {
    match self.metadata.iter_mut().find(|(k, _)| k == key) {
      Some((_, v)) => *v = value.to_string(),
      None => self.metadata.push((key.to_string(), value.to_string())),
    }
  }

  /// The module name, required for any operation beyond inspection
  pub fn name(&self) -> Option<&str> {
    self.get("name")
  }

  /// The module's declared version string
  pub fn version(&self) -> Option<&str> {
    self.get("version")
  }

  /// Serialize to descriptor text
  ///
  /// Metadata lines in insertion order with capitalized keys, a `Depends:`
  /// line when dependencies exist, then (optionally) a blank line and the
  /// file list. Output always ends with a trailing blank line.
  pub fn serialize(&self, include_files: bool) -> String {
    let mut out = String::new();

    for (key, value) in &self.metadata {
      out.push_str(&capitalize(key));
      out.push_str(": ");
      out.push_str(value);
      out.push('\n');
    }

    if !self.dependencies.is_empty() {
      let groups: Vec<String> = self.dependencies.iter().map(|group| group.join(" ")).collect();
      out.push_str("Depends: ");
      out.push_str(&groups.join(", "));
      out.push('\n');
    }

    if include_files {
      out.push('\n');
      for file in &self.files {
        out.push_str(file);
        out.push('\n');
      }
    }

    out.push('\n');
    out
  }
}

/// Upper-case the first character of a lower-cased key
fn capitalize(key: &str) -> String {
  let mut chars = key.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}

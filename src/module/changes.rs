//! Change detection against an externally-reported changed-file set
//!
//! A module counts as changed when a changed path exactly matches one of its
//! file entries, or when any file entry is a literal string prefix of a
//! changed path. The prefix test is raw string matching, not path-segment
//! aware: an entry `lib` matches `lib/x.php` and `library/x.php` alike.

use crate::module::ModuleDescriptor;
use std::collections::HashSet;

/// Answers "did anything in this module change?" for a fixed changed-file set
pub struct ChangeDetector {
  exact: HashSet<String>,
  changed: Vec<String>,
}

impl ChangeDetector {
  /// Build a detector over repository-relative changed paths
  pub fn new(changed_files: impl IntoIterator<Item = String>) -> Self {
    let changed: Vec<String> = changed_files.into_iter().collect();
    let exact = changed.iter().cloned().collect();
    Self { exact, changed }
  }

  /// Whether the descriptor's declared files intersect the changed set
  pub fn changed(&self, descriptor: &ModuleDescriptor) -> bool {
    for entry in &descriptor.files {
      if self.exact.contains(entry) {
        return true;
      }
    }

    self
      .changed
      .iter()
      .any(|path| descriptor.files.iter().any(|entry| path.starts_with(entry.as_str())))
  }
}

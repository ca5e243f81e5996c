//! Version constant rewriting
//!
//! On a core release, the configured source file carries a version constant
//! that must track the new core version. The first line containing the
//! configured marker is replaced wholesale with the filled-in template.

use crate::core::config::VersionPatchConfig;
use crate::core::error::{ResultExt, ShipResult};
use std::fs;
use std::path::Path;

/// Rewrite the version constant line; returns whether a line matched
pub fn patch_version_constant(workspace_root: &Path, patch: &VersionPatchConfig, version: &str) -> ShipResult<bool> {
  let path = workspace_root.join(&patch.file);
  let content =
    fs::read_to_string(&path).with_context(|| format!("Failed to read version file {}", path.display()))?;

  let replacement = patch.template.replace("{version}", version);
  let mut patched = false;
  let mut lines: Vec<&str> = Vec::new();

  for line in content.lines() {
    if !patched && line.contains(&patch.marker) {
      lines.push(&replacement);
      patched = true;
    } else {
      lines.push(line);
    }
  }

  if patched {
    let mut output = lines.join("\n");
    if content.ends_with('\n') {
      output.push('\n');
    }
    fs::write(&path, output).with_context(|| format!("Failed to write version file {}", path.display()))?;
  }

  Ok(patched)
}

//! Deployment fan-out into a versioned bundle tree
//!
//! Copies a module's declared files and directories from the source tree
//! into `<target>/<name>/<version>/…` and writes the per-version `.module`
//! manifest. Re-running with unchanged inputs reproduces the same tree.

use crate::core::error::{ResultExt, ShipResult};
use crate::module::{ModuleDescriptor, Version};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of deploying one descriptor
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeployOutcome {
  /// Module copied and manifest written
  Deployed {
    name: String,
    version: String,
    files: usize,
    target: PathBuf,
  },
  /// Descriptor has no name; nothing can be deployed for it
  SkippedNoName,
  /// Descriptor has no version metadata; deployment is not meaningful yet
  SkippedNoVersion { name: String },
}

/// Copies descriptors' declared files into the versioned target tree
pub struct Deployer {
  source_dir: PathBuf,
  target_dir: PathBuf,
}

impl Deployer {
  pub fn new(source_dir: &Path, target_dir: &Path) -> Self {
    Self {
      source_dir: source_dir.to_path_buf(),
      target_dir: target_dir.to_path_buf(),
    }
  }

  /// Deploy a single module
  ///
  /// Missing name/version are soft skips surfaced through the outcome; a
  /// malformed version string is a fatal error. `on_file` is invoked after
  /// each file entry lands, for progress reporting.
  pub fn deploy(
    &self,
    descriptor: &mut ModuleDescriptor,
    mut on_file: impl FnMut(&str),
  ) -> ShipResult<DeployOutcome> {
    let Some(name) = descriptor.name().map(str::to_string) else {
      return Ok(DeployOutcome::SkippedNoName);
    };
    let Some(raw_version) = descriptor.version().map(str::to_string) else {
      return Ok(DeployOutcome::SkippedNoVersion { name });
    };

    let version = Version::parse(&raw_version)?;
    let module_root = self.target_dir.join(&name).join(version.to_string());

    for entry in &descriptor.files {
      let source = self.source_dir.join(entry);
      let target = module_root.join(entry);

      if source.is_dir() {
        // Full tree replace, not merge
        if target.exists() {
          fs::remove_dir_all(&target)
            .with_context(|| format!("Failed to remove stale directory {}", target.display()))?;
        }
        copy_dir_recursive(&source, &target)?;
      } else {
        if let Some(parent) = target.parent() {
          fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        if target.exists() {
          fs::remove_file(&target).with_context(|| format!("Failed to remove stale file {}", target.display()))?;
        }
        fs::copy(&source, &target)
          .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;
      }

      on_file(entry);
    }

    // Canonical version string in the manifest, even when the descriptor
    // declared a formatting variant of it.
    descriptor.set("version", &version.to_string());

    fs::create_dir_all(&module_root)
      .with_context(|| format!("Failed to create module directory {}", module_root.display()))?;
    descriptor.store(&module_root.join(".module"), false)?;

    Ok(DeployOutcome::Deployed {
      files: descriptor.files.len(),
      version: version.to_string(),
      target: module_root,
      name,
    })
  }
}

/// Recursively copy a directory tree, creating intermediate directories
fn copy_dir_recursive(source: &Path, target: &Path) -> ShipResult<()> {
  fs::create_dir_all(target).with_context(|| format!("Failed to create directory {}", target.display()))?;

  for entry in fs::read_dir(source).with_context(|| format!("Failed to read directory {}", source.display()))? {
    let entry = entry.with_context(|| format!("Failed to read directory entry in {}", source.display()))?;
    let source_path = entry.path();
    let target_path = target.join(entry.file_name());

    if source_path.is_dir() {
      copy_dir_recursive(&source_path, &target_path)?;
    } else {
      fs::copy(&source_path, &target_path)
        .with_context(|| format!("Failed to copy {} to {}", source_path.display(), target_path.display()))?;
    }
  }

  Ok(())
}

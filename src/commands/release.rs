//! Release command implementation
//!
//! Analyzes the working tree against a source ref, then (unless testing)
//! persists bumped descriptors, rewrites the version constant, commits, and
//! force-moves the release and source tags.

use crate::core::config::ShipConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::vcs::SystemGit;
use crate::module::{Granularity, ModuleDescriptor};
use crate::release::plan::ModuleBump;
use crate::release::{patch, ReleasePlan};
use std::env;

/// Commit message used for every release commit
const RELEASE_COMMIT_MESSAGE: &str = "Auto-increment module versions for release";

/// Run the release command
pub fn run_release(source: String, level: Granularity, dry_run: bool, json: bool) -> ShipResult<()> {
  // The original tool treats one-character refs as missing input
  if source.len() <= 1 {
    return Err(ShipError::with_help(
      "Missing source commit!",
      "Pass the source ref to compare against with -s <ref>",
    ));
  }

  // Anchor everything at the git work-tree root so the command behaves the
  // same from any subdirectory.
  let git = SystemGit::open(&env::current_dir()?)?;
  let workspace_root = git.work_tree().to_path_buf();
  let config = ShipConfig::load_or_default(&workspace_root)?;

  let plan = ReleasePlan::analyze(&workspace_root, &config, &git, &source, level)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&plan)?);
  } else {
    for path in &plan.bad_modules {
      println!("⚠️  Bad module: {}", path.display());
    }
    for bump in &plan.bumps {
      println!("📦 Module '{}' changed to version {}", bump.name, bump.next);
    }
  }

  if !plan.has_changes() {
    if !json {
      println!("No changes");
    }
    return Ok(());
  }

  if dry_run {
    if !json {
      println!();
      println!("🔍 Dry-run mode (no changes applied)");
      println!("   Plan: {}", plan.id());
    }
    return Ok(());
  }

  for bump in &plan.bumps {
    persist_bump(bump)?;
  }

  if let Some(core_version) = &plan.core_version {
    if !json {
      println!("Core version updated to: {}", core_version);
    }
    if let Some(patch_config) = &config.release.version_patch {
      if patch::patch_version_constant(&workspace_root, patch_config, &core_version.to_string())? {
        if !json {
          println!("   Updated {}", patch_config.file.display());
        }
      } else {
        eprintln!(
          "⚠️  No line matching '{}' in {}",
          patch_config.marker,
          patch_config.file.display()
        );
      }
    }
  }

  if !json {
    println!("Committing module version updates");
  }
  git.commit_all(RELEASE_COMMIT_MESSAGE)?;

  if let Some(core_version) = &plan.core_version {
    if !json {
      println!("Creating version tag");
    }
    git.force_tag(&core_version.to_string())?;
  }

  if !json {
    println!("Updating source tag: {}", source);
  }
  git.force_tag(&source)?;

  Ok(())
}

/// Write a bumped descriptor back to its definition file
fn persist_bump(bump: &ModuleBump) -> ShipResult<()> {
  let mut descriptor = ModuleDescriptor::load(&bump.path)?;
  descriptor.set("version", &bump.next.to_string());
  descriptor.store(&bump.path, true)
}

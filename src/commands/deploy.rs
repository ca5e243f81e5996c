//! Deploy command implementation
//!
//! Reads every descriptor in the module definitions directory and fans each
//! one out into the versioned target tree. Bad descriptors are reported and
//! skipped; the pass continues with the next module.

use crate::core::config::ShipConfig;
use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use crate::deploy::{DeployOutcome, Deployer};
use crate::module::ModuleDescriptor;
use crate::ui::progress::FileProgress;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// JSON report for `deploy --json`
#[derive(Serialize)]
struct DeployReport {
  target: PathBuf,
  modules: Vec<DeployRecord>,
}

#[derive(Serialize)]
struct DeployRecord {
  definition: PathBuf,
  #[serde(flatten)]
  outcome: DeployOutcome,
}

/// Run the deploy command
pub fn run_deploy(target: Option<PathBuf>, json: bool) -> ShipResult<()> {
  let Some(target) = target else {
    return Err(ShipError::with_help(
      "Missing target directory!",
      "Usage: modship deploy <target-dir>",
    ));
  };

  let workspace_root = env::current_dir()?;
  let config = ShipConfig::load_or_default(&workspace_root)?;

  let definitions = config.definitions_dir(&workspace_root);
  if !definitions.is_dir() {
    return Err(ShipError::Config(ConfigError::DefinitionsNotFound { path: definitions }));
  }

  fs::create_dir_all(&target).with_context(|| format!("Failed to create target directory {}", target.display()))?;

  let source_dir = config.source_dir(&workspace_root);
  let deployer = Deployer::new(&source_dir, &target);

  let mut records = Vec::new();
  let mut deployed = 0usize;

  for entry in fs::read_dir(&definitions)? {
    let path = entry?.path();
    if !path.is_file() {
      continue;
    }

    let mut descriptor = ModuleDescriptor::load(&path)?;

    let total = descriptor.files.len();
    let mut bar = (!json && total > 0 && descriptor.has("name") && descriptor.has("version"))
      .then(|| FileProgress::new(total, path.file_name().unwrap_or_default().to_string_lossy().to_string()));

    let outcome = deployer.deploy(&mut descriptor, |_| {
      if let Some(bar) = bar.as_mut() {
        bar.inc();
      }
    })?;

    if !json {
      match &outcome {
        DeployOutcome::Deployed { name, version, files, .. } => {
          println!("📦 Processing: {} ({}), {} file(s)", name, version, files);
          deployed += 1;
        }
        DeployOutcome::SkippedNoName => {
          println!("⚠️  Bad module: {}", path.display());
        }
        DeployOutcome::SkippedNoVersion { name } => {
          println!("⚠️  Skipping {} due to no version", name);
        }
      }
    } else if matches!(outcome, DeployOutcome::Deployed { .. }) {
      deployed += 1;
    }

    records.push(DeployRecord {
      definition: path,
      outcome,
    });
  }

  if json {
    let report = DeployReport {
      target: target.clone(),
      modules: records,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    println!();
    println!("✅ Deployed {} module(s) to {}", deployed, target.display());
  }

  Ok(())
}

//! Release planning: detect changed modules and compute version bumps
//!
//! A plan is pure analysis: resolving the source ref, diffing the working
//! tree, and walking the module definitions directory. Nothing is written
//! until the command layer applies it.

use crate::core::config::ShipConfig;
use crate::core::error::{ConfigError, ShipError, ShipResult};
use crate::core::vcs::SystemGit;
use crate::module::{ChangeDetector, Granularity, ModuleDescriptor, Version};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Plan identifier (SHA256 hash of the plan's stable contents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// One module's pending version bump
#[derive(Debug, Clone, Serialize)]
pub struct ModuleBump {
  pub name: String,
  /// Descriptor file this bump persists to
  pub path: PathBuf,
  pub previous: Version,
  pub next: Version,
}

/// Release plan for one source ref and granularity
#[derive(Debug, Serialize)]
pub struct ReleasePlan {
  pub source: String,
  pub source_sha: String,
  pub level: Granularity,
  pub changed_files: Vec<String>,
  pub bumps: Vec<ModuleBump>,
  /// Descriptors skipped because they declare no name
  pub bad_modules: Vec<PathBuf>,
  /// New version of the core module, when it changed
  pub core_version: Option<Version>,
  pub created_at: DateTime<Utc>,
}

impl ReleasePlan {
  /// Analyze the working tree against a source ref
  ///
  /// Fails fast when the ref does not resolve; a malformed version string in
  /// any changed module aborts the whole pass.
  pub fn analyze(
    workspace_root: &Path,
    config: &ShipConfig,
    git: &SystemGit,
    source: &str,
    level: Granularity,
  ) -> ShipResult<Self> {
    let source_sha = git.resolve_ref(source)?;
    let changed_files = git.diff_name_only(source)?;
    let detector = ChangeDetector::new(changed_files.iter().cloned());

    let definitions = config.definitions_dir(workspace_root);
    let (bumps, bad_modules, core_version) =
      scan_definitions(&definitions, &detector, level, &config.release.core_module)?;

    Ok(Self {
      source: source.to_string(),
      source_sha,
      level,
      changed_files,
      bumps,
      bad_modules,
      core_version,
      created_at: Utc::now(),
    })
  }

  /// Whether any module changed
  pub fn has_changes(&self) -> bool {
    !self.bumps.is_empty()
  }

  /// Stable identifier over the plan's inputs and outcome
  pub fn id(&self) -> PlanId {
    let mut contents = format!("{}:{}", self.source_sha, self.level);
    for bump in &self.bumps {
      contents.push_str(&format!(":{}={}>{}", bump.name, bump.previous, bump.next));
    }
    PlanId::from_contents(contents.as_bytes())
  }
}

/// Walk the definitions directory in listing order and compute bumps
fn scan_definitions(
  definitions: &Path,
  detector: &ChangeDetector,
  level: Granularity,
  core_module: &str,
) -> ShipResult<(Vec<ModuleBump>, Vec<PathBuf>, Option<Version>)> {
  if !definitions.is_dir() {
    return Err(ShipError::Config(ConfigError::DefinitionsNotFound {
      path: definitions.to_path_buf(),
    }));
  }

  let mut bumps = Vec::new();
  let mut bad_modules = Vec::new();
  let mut core_version = None;

  for entry in fs::read_dir(definitions)? {
    let path = entry?.path();
    if !path.is_file() {
      continue;
    }

    let descriptor = ModuleDescriptor::load(&path)?;
    let Some(name) = descriptor.name().map(str::to_string) else {
      bad_modules.push(path);
      continue;
    };
    let Some(raw_version) = descriptor.version() else {
      continue;
    };
    if !detector.changed(&descriptor) {
      continue;
    }

    let previous = Version::parse(raw_version)?;
    let next = previous.bump(level);
    if name == core_module {
      core_version = Some(next.clone());
    }
    bumps.push(ModuleBump {
      name,
      path,
      previous,
      next,
    });
  }

  Ok((bumps, bad_modules, core_version))
}

//! Workspace configuration (ship.toml) parsing
//!
//! Every field has a default so the tool runs in an unconfigured workspace.
//! The definitions directory, source root, core module name, and the version
//! constant patch target are all explicit configuration rather than paths
//! derived from the process environment.

use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for modship
/// Searched in order: ship.toml, .ship.toml, .config/ship.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipConfig {
  #[serde(default)]
  pub modules: ModulesConfig,
  #[serde(default)]
  pub release: ReleaseConfig,
}

/// Where module definitions and their source files live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesConfig {
  /// Directory of module descriptor files (relative to workspace root)
  #[serde(default = "default_definitions")]
  pub definitions: PathBuf,

  /// Source tree root that descriptor file entries are relative to
  #[serde(default = "default_source")]
  pub source: PathBuf,
}

fn default_definitions() -> PathBuf {
  PathBuf::from(".modules")
}

fn default_source() -> PathBuf {
  PathBuf::from(".")
}

impl Default for ModulesConfig {
  fn default() -> Self {
    Self {
      definitions: default_definitions(),
      source: default_source(),
    }
  }
}

/// Release behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  /// Module whose new version names the release tag
  #[serde(default = "default_core_module")]
  pub core_module: String,

  /// Optional version constant rewrite applied when the core module bumps
  #[serde(default)]
  pub version_patch: Option<VersionPatchConfig>,
}

fn default_core_module() -> String {
  "core".to_string()
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      core_module: default_core_module(),
      version_patch: None,
    }
  }
}

/// A single-line version constant rewrite target
///
/// The first line of `file` containing `marker` is replaced with `template`,
/// with `{version}` substituted by the new core version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionPatchConfig {
  /// File to patch (relative to workspace root)
  pub file: PathBuf,

  /// Substring identifying the line to replace
  pub marker: String,

  /// Replacement line, with `{version}` as the placeholder
  pub template: String,
}

impl ShipConfig {
  /// Find config file in search order: ship.toml, .ship.toml, .config/ship.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("ship.toml"),
      path.join(".ship.toml"),
      path.join(".config").join("ship.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from ship.toml, falling back to defaults when absent
  pub fn load_or_default(path: &Path) -> ShipResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ShipConfig = toml_edit::de::from_str(&content).map_err(|e| {
      ShipError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })?;

    Ok(config)
  }

  /// Absolute path of the module definitions directory
  pub fn definitions_dir(&self, workspace_root: &Path) -> PathBuf {
    workspace_root.join(&self.modules.definitions)
  }

  /// Absolute path of the source tree root
  pub fn source_dir(&self, workspace_root: &Path) -> PathBuf {
    workspace_root.join(&self.modules.source)
  }
}

//! Integration tests for `modship release`

use crate::helpers::{run_modship, run_modship_raw, TestWorkspace};
use anyhow::Result;

/// Workspace with a core module and an unrelated module, tagged `current`
fn release_fixture() -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.add_source_file("lib/core.php", "<?php // core")?;
  ws.add_source_file("extras/other.php", "<?php // other")?;
  ws.add_module("core", "Name: core\nVersion: 1.0.0\n\nlib/\n")?;
  ws.add_module("other", "Name: other\nVersion: 2.1.0\n\nextras/\n")?;
  ws.commit("Add modules")?;
  ws.tag("current")?;
  Ok(ws)
}

#[test]
fn test_release_bumps_only_changed_modules() -> Result<()> {
  let ws = release_fixture()?;
  ws.add_source_file("lib/core.php", "<?php // core changed")?;

  let output = run_modship(&ws.path, &["release", "-u", "minor"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Module 'core' changed to version 1.1.0"));
  assert!(stdout.contains("Core version updated to: 1.1.0"));

  let core = ws.read_file(".modules/core")?;
  assert!(core.contains("Version: 1.1.0"));
  assert!(core.contains("lib/"), "release write must include the file list");

  let other = ws.read_file(".modules/other")?;
  assert!(other.contains("Version: 2.1.0"), "unaffected module must keep its version");

  Ok(())
}

#[test]
fn test_release_commits_and_moves_tags() -> Result<()> {
  let ws = release_fixture()?;
  let before = ws.rev_parse("current")?;
  ws.add_source_file("lib/core.php", "<?php // core changed")?;

  run_modship(&ws.path, &["release"])?;

  assert_eq!(ws.last_commit_message()?, "Auto-increment module versions for release");
  assert!(ws.has_tag("1.0.1")?, "core version tag should exist");

  let after = ws.rev_parse("current")?;
  assert_ne!(before, after, "source tag should move to the release commit");
  assert_eq!(after, ws.rev_parse("HEAD")?);

  Ok(())
}

#[test]
fn test_release_without_core_change_skips_version_tag() -> Result<()> {
  let ws = release_fixture()?;
  ws.add_source_file("extras/other.php", "<?php // other changed")?;

  let output = run_modship(&ws.path, &["release"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Module 'other' changed to version 2.1.1"));
  assert!(!stdout.contains("Core version updated"));
  assert!(!ws.has_tag("2.1.1")?, "only the core module names a version tag");

  Ok(())
}

#[test]
fn test_release_dry_run_changes_nothing() -> Result<()> {
  let ws = release_fixture()?;
  ws.add_source_file("lib/core.php", "<?php // core changed")?;
  let head = ws.rev_parse("HEAD")?;

  let output = run_modship(&ws.path, &["release", "-t", "-u", "minor"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Module 'core' changed to version 1.1.0"));
  assert!(stdout.contains("Dry-run"));

  assert!(ws.read_file(".modules/core")?.contains("Version: 1.0.0"));
  assert_eq!(ws.rev_parse("HEAD")?, head, "dry run must not commit");
  assert!(!ws.has_tag("1.1.0")?);

  Ok(())
}

#[test]
fn test_release_reports_no_changes() -> Result<()> {
  let ws = release_fixture()?;

  let output = run_modship(&ws.path, &["release"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("No changes"));
  assert!(ws.read_file(".modules/core")?.contains("Version: 1.0.0"));

  Ok(())
}

#[test]
fn test_release_patches_version_constant() -> Result<()> {
  let ws = release_fixture()?;
  ws.add_source_file("app.php", "<?php\ndefine('APP_VERSION', '1.0.0');\n")?;
  std::fs::write(
    ws.path.join("ship.toml"),
    r#"[release.version_patch]
file = "app.php"
marker = "APP_VERSION"
template = "define('APP_VERSION', '{version}');"
"#,
  )?;
  ws.commit("Add version constant")?;
  ws.tag("current")?;
  ws.add_source_file("lib/core.php", "<?php // core changed")?;

  run_modship(&ws.path, &["release", "-u", "major"])?;

  let app = ws.read_file("app.php")?;
  assert!(app.contains("define('APP_VERSION', '2.0.0');"), "got: {}", app);

  Ok(())
}

#[test]
fn test_release_unresolvable_source_ref_fails() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_modship_raw(&ws.path, &["release", "-s", "no-such-tag"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Source commit ref not found"));

  Ok(())
}

#[test]
fn test_release_rejects_trivial_source_ref() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_modship_raw(&ws.path, &["release", "-s", "x"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Missing source commit!"));

  Ok(())
}

#[test]
fn test_release_json_plan() -> Result<()> {
  let ws = release_fixture()?;
  ws.add_source_file("lib/core.php", "<?php // core changed")?;

  let output = run_modship(&ws.path, &["release", "-t", "-u", "minor", "--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let json: serde_json::Value = serde_json::from_str(&stdout)?;
  assert_eq!(json["level"], "minor");
  assert_eq!(json["core_version"], "1.1.0");

  let bumps = json["bumps"].as_array().expect("bumps array");
  assert_eq!(bumps.len(), 1);
  assert_eq!(bumps[0]["name"], "core");
  assert_eq!(bumps[0]["previous"], "1.0.0");
  assert_eq!(bumps[0]["next"], "1.1.0");

  Ok(())
}

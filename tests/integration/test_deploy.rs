//! Integration tests for `modship deploy`

use crate::helpers::{run_modship, run_modship_raw, TestWorkspace};
use anyhow::Result;

#[test]
fn test_deploy_copies_files_and_writes_manifest() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_source_file("a.txt", "alpha")?;
  ws.add_source_file("sub/inner.txt", "inner")?;
  ws.add_module("foo", "Name: foo\nVersion: 1.2.3\n\na.txt\nsub\n")?;
  ws.commit("Add foo module")?;

  run_modship(&ws.path, &["deploy", "dist"])?;

  assert_eq!(ws.read_file("dist/foo/1.2.3/a.txt")?, "alpha");
  assert_eq!(ws.read_file("dist/foo/1.2.3/sub/inner.txt")?, "inner");

  let manifest = ws.read_file("dist/foo/1.2.3/.module")?;
  assert!(manifest.contains("Name: foo"));
  assert!(manifest.contains("Version: 1.2.3"));
  assert!(!manifest.contains("a.txt"), "manifest must not carry the file list");

  Ok(())
}

#[test]
fn test_deploy_is_idempotent() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_source_file("a.txt", "alpha")?;
  ws.add_module("foo", "Name: foo\nVersion: 1.2.3\n\na.txt\n")?;

  run_modship(&ws.path, &["deploy", "dist"])?;
  let first = ws.read_file("dist/foo/1.2.3/.module")?;

  run_modship(&ws.path, &["deploy", "dist"])?;
  assert_eq!(ws.read_file("dist/foo/1.2.3/.module")?, first);
  assert_eq!(ws.read_file("dist/foo/1.2.3/a.txt")?, "alpha");

  Ok(())
}

#[test]
fn test_deploy_skips_bad_modules_and_continues() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_source_file("a.txt", "alpha")?;
  ws.add_module("noname", "Version: 1.0\n\na.txt\n")?;
  ws.add_module("unversioned", "Name: unversioned\n\na.txt\n")?;
  ws.add_module("good", "Name: good\nVersion: 0.1\n\na.txt\n")?;

  let output = run_modship(&ws.path, &["deploy", "dist"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Bad module"), "should report the nameless module");
  assert!(
    stdout.contains("Skipping unversioned due to no version"),
    "should report the versionless module"
  );
  assert!(ws.read_file("dist/good/0.1/.module").is_ok());

  Ok(())
}

#[test]
fn test_deploy_without_target_exits_one() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_modship_raw(&ws.path, &["deploy"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Missing target directory!"));

  Ok(())
}

#[test]
fn test_deploy_malformed_version_aborts_run() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_source_file("a.txt", "alpha")?;
  ws.add_module("broken", "Name: broken\nVersion: 1.x\n\na.txt\n")?;

  let output = run_modship_raw(&ws.path, &["deploy", "dist"])?;
  assert!(!output.status.success());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Invalid module version"));

  Ok(())
}

#[test]
fn test_deploy_json_report() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_source_file("a.txt", "alpha")?;
  ws.add_module("foo", "Name: foo\nVersion: 1.0\n\na.txt\n")?;

  let output = run_modship(&ws.path, &["deploy", "dist", "--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let json: serde_json::Value = serde_json::from_str(&stdout)?;
  let modules = json["modules"].as_array().expect("modules array");
  assert_eq!(modules.len(), 1);
  assert_eq!(modules[0]["status"], "deployed");
  assert_eq!(modules[0]["name"], "foo");
  assert_eq!(modules[0]["version"], "1.0");

  Ok(())
}

#[test]
fn test_deploy_respects_configured_directories() -> Result<()> {
  let ws = TestWorkspace::new()?;
  std::fs::write(
    ws.path.join("ship.toml"),
    "[modules]\ndefinitions = \"defs\"\nsource = \"srctree\"\n",
  )?;
  std::fs::create_dir_all(ws.path.join("defs"))?;
  ws.add_source_file("srctree/a.txt", "alpha")?;
  std::fs::write(ws.path.join("defs/foo"), "Name: foo\nVersion: 1.0\n\na.txt\n")?;

  run_modship(&ws.path, &["deploy", "dist"])?;
  assert_eq!(ws.read_file("dist/foo/1.0/a.txt")?, "alpha");

  Ok(())
}

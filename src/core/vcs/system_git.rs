//! System git backend - zero dependencies
//!
//! Uses git plumbing commands for all operations, executed with an isolated
//! environment so user configuration cannot change behavior. All calls are
//! blocking and strictly sequential.

use crate::core::error::{GitError, ResultExt, ShipError, ShipResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,

  /// Working tree root
  work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> ShipResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ShipError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ShipError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Resolve a ref to a commit SHA
  pub fn resolve_ref(&self, refname: &str) -> ShipResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", refname])
      .output()
      .context("Failed to run git rev-parse")?;

    if !output.status.success() {
      return Err(ShipError::Git(GitError::RefNotFound {
        refname: refname.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Paths changed between a ref and the working tree
  ///
  /// One repository-relative path per changed file, in git's output order.
  pub fn diff_name_only(&self, refname: &str) -> ShipResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["diff", refname, "--name-only"])
      .output()
      .context("Failed to run git diff")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::Git(GitError::CommandFailed {
        command: format!("git diff {} --name-only", refname),
        stderr: stderr.to_string(),
      }));
    }

    let changed = String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect();

    Ok(changed)
  }

  /// Commit all working-tree changes
  ///
  /// A failed commit whose output says there was nothing to commit is treated
  /// as success; every other failure surfaces.
  pub fn commit_all(&self, message: &str) -> ShipResult<()> {
    let output = self
      .git_cmd()
      .args(["commit", "-a", "-m", message, "-q"])
      .output()
      .context("Failed to run git commit")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stdout = String::from_utf8_lossy(&output.stdout);
      if is_nothing_to_commit(&stdout) || is_nothing_to_commit(&stderr) {
        return Ok(());
      }
      return Err(ShipError::Git(GitError::CommandFailed {
        command: "git commit -a".to_string(),
        stderr: format!("{}{}", stdout, stderr),
      }));
    }

    Ok(())
  }

  /// Create or move a tag to the current HEAD
  pub fn force_tag(&self, name: &str) -> ShipResult<()> {
    let output = self
      .git_cmd()
      .args(["tag", "-f", name])
      .output()
      .context("Failed to run git tag")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::Git(GitError::CommandFailed {
        command: format!("git tag -f {}", name),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

/// Recognize the "nothing to commit"-class outcomes that `git commit -a`
/// reports on a clean tree.
fn is_nothing_to_commit(output: &str) -> bool {
  output.contains("nothing to commit") || output.contains("no changes added to commit")
}

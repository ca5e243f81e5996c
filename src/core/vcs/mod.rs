//! Git operations abstraction
//!
//! All version-control access goes through `SystemGit`, a system-git
//! subprocess backend with an isolated environment.

mod system_git;

pub use system_git::SystemGit;

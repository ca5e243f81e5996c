//! CLI commands for modship
//!
//! - **deploy**: copy every module's declared files into a versioned bundle
//!   tree and write per-version manifests
//! - **release**: detect changed modules since a source ref, bump versions,
//!   commit, and move tags

pub mod deploy;
pub mod release;

pub use deploy::run_deploy;
pub use release::run_release;

//! Release automation
//!
//! - **plan**: analyze changed files and compute per-module version bumps
//! - **patch**: rewrite the configured version constant on core releases

pub mod patch;
pub mod plan;

pub use plan::{ModuleBump, PlanId, ReleasePlan};

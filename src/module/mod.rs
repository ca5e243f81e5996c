//! The module descriptor model
//!
//! - **version**: dotted-integer versions with granularity-scoped bumps
//! - **descriptor**: module metadata, dependency, and file-list records
//! - **changes**: change detection against an externally-reported file set

pub mod changes;
pub mod descriptor;
pub mod version;

pub use changes::ChangeDetector;
pub use descriptor::ModuleDescriptor;
pub use version::{Granularity, Version};

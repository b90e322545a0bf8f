//! Domain logic - pure rules independent of git and registry access

pub mod branch;
pub mod mode;
pub mod module;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use branch::{branch_slug, BranchContext};
pub use mode::{local_version, PublishMode};
pub use module::ModuleIdentity;
pub use prerelease::{PreRelease, PreReleaseStyle};
pub use tag::{TagNamespace, DEFAULT_TAG_PREFIX};
pub use version::{compare_versions, Version};

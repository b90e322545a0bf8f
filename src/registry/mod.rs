//! Remote package registry access
//!
//! The registry is the second oracle for "what has already been published":
//! the versions the outside world can actually resolve, as opposed to the
//! tags recorded in git.
//!
//! - [RegistryClient]: the per-module "which versions exist" query
//! - [MavenRegistry]: a Maven-layout HTTP repository (`maven-metadata.xml`)
//! - [MockRegistry]: in-memory registry for tests
//! - [RegistryVersionOracle]: latest-version probe with a short cache window

pub mod maven;
pub mod mock;
pub mod oracle;

pub use maven::MavenRegistry;
pub use mock::MockRegistry;
pub use oracle::RegistryVersionOracle;

use crate::domain::ModuleIdentity;
use crate::error::Result;

/// Query for the versions a registry currently serves
///
/// Lookups are non-transitive: only the module itself is queried, never its
/// dependencies.
pub trait RegistryClient: Send + Sync {
    /// Every version published for `module`.
    ///
    /// # Returns
    /// * `Ok(vec![])` - module never published
    /// * `Err(RegistryUnavailable)` - transport or server failure
    fn published_versions(&self, module: &ModuleIdentity) -> Result<Vec<String>>;
}

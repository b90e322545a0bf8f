//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! operations version resolution needs, with a real implementation on top of
//! `git2` and an in-memory mock for tests.
//!
//! # Overview
//!
//! - [Git2Vcs]: discovers the repository at or above a path and talks to its
//!   remote through libgit2
//! - [MockVcs]: records tag pushes and counts remote lookups
//! - [TagHistoryStore]: the publish-tag namespace on top of any [Vcs]
//!
//! Most code should depend on the [Vcs] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use publish_version::git::Vcs;
//! # fn example<V: Vcs>(vcs: &V) -> publish_version::Result<()> {
//! let branch = vcs.current_branch()?;
//! let default = vcs.default_branch("origin")?;
//! println!("{} (default: {:?})", branch, default);
//! # Ok(())
//! # }
//! ```

pub mod history;
pub mod mock;
pub mod repository;

pub use history::TagHistoryStore;
pub use mock::MockVcs;
pub use repository::Git2Vcs;

use crate::error::Result;

/// Version-control operations used for version resolution and tag publishing
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`; a single instance is shared by every
/// consumer of one invocation.
///
/// ## Error Handling
///
/// Transport and authentication failures surface as
/// [crate::error::PublishError::VcsUnavailable] and are never retried here.
pub trait Vcs: Send + Sync {
    /// Name of the checked-out branch.
    ///
    /// A detached HEAD yields the full commit hash instead.
    fn current_branch(&self) -> Result<String>;

    /// Default branch advertised by the remote's symbolic HEAD.
    ///
    /// # Returns
    /// * `Ok(Some(branch))` - short branch name (e.g. "main")
    /// * `Ok(None)` - remote missing, unreachable, or without a default
    fn default_branch(&self, remote: &str) -> Result<Option<String>>;

    /// First `len` hex characters of the HEAD commit hash
    fn short_hash(&self, len: usize) -> Result<String>;

    /// All tag names advertised by the remote, without the `refs/tags/` prefix
    fn list_remote_tags(&self, remote: &str) -> Result<Vec<String>>;

    /// Delete a local tag; a tag that does not exist is not an error
    fn delete_local_tag(&self, name: &str) -> Result<()>;

    /// Create an annotated tag on HEAD
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push one tag to a remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;

    /// Configured fetch URL of a remote, if the remote exists
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;
}

impl<V: Vcs + ?Sized> Vcs for std::sync::Arc<V> {
    fn current_branch(&self) -> Result<String> {
        (**self).current_branch()
    }

    fn default_branch(&self, remote: &str) -> Result<Option<String>> {
        (**self).default_branch(remote)
    }

    fn short_hash(&self, len: usize) -> Result<String> {
        (**self).short_hash(len)
    }

    fn list_remote_tags(&self, remote: &str) -> Result<Vec<String>> {
        (**self).list_remote_tags(remote)
    }

    fn delete_local_tag(&self, name: &str) -> Result<()> {
        (**self).delete_local_tag(name)
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        (**self).create_annotated_tag(name, message)
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        (**self).push_tag(remote, name)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        (**self).remote_url(remote)
    }
}

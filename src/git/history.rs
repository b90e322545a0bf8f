//! Publish-tag history on the remote
//!
//! Tags are the durable record of "this exact version was published from
//! this exact commit". Listing always goes to the remote, never to local
//! tags, so a stale clone cannot hide a version someone else published.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::Result;
use crate::git::Vcs;

/// Read/write access to the remote tag namespace through a [Vcs]
pub struct TagHistoryStore<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    remote: &'a str,
}

impl<'a, V: Vcs + ?Sized> TagHistoryStore<'a, V> {
    pub fn new(vcs: &'a V, remote: &'a str) -> Self {
        TagHistoryStore { vcs, remote }
    }

    /// Remote tags starting with `prefix`, with the prefix stripped.
    ///
    /// Transport failures propagate as `VcsUnavailable`.
    pub fn list_tags(&self, prefix: &str) -> Result<BTreeSet<String>> {
        let tags: BTreeSet<String> = self
            .vcs
            .list_remote_tags(self.remote)?
            .into_iter()
            .filter_map(|tag| tag.strip_prefix(prefix).map(str::to_string))
            .collect();
        debug!(remote = self.remote, prefix, count = tags.len(), "listed remote tags");
        Ok(tags)
    }

    /// Replace any local tag called `name`, then create an annotated tag on
    /// HEAD and push it.
    pub fn create_and_push_tag(&self, name: &str, message: &str) -> Result<()> {
        self.vcs.delete_local_tag(name)?;
        self.vcs.create_annotated_tag(name, message)?;
        self.vcs.push_tag(self.remote, name)?;
        info!(remote = self.remote, tag = name, "pushed publish tag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockVcs;

    #[test]
    fn test_list_tags_filters_and_strips_prefix() {
        let mut vcs = MockVcs::new();
        vcs.add_remote_tag("published/1.0.0");
        vcs.add_remote_tag("published/1.2.3");
        vcs.add_remote_tag("v9.9.9");
        let store = TagHistoryStore::new(&vcs, "origin");

        let tags = store.list_tags("published/").unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("1.0.0"));
        assert!(tags.contains("1.2.3"));
    }

    #[test]
    fn test_list_tags_propagates_transport_error() {
        let mut vcs = MockVcs::new();
        vcs.set_unreachable(true);
        let store = TagHistoryStore::new(&vcs, "origin");
        assert!(store.list_tags("published/").is_err());
    }

    #[test]
    fn test_create_and_push_replaces_stale_local_tag() {
        let mut vcs = MockVcs::new();
        vcs.add_local_tag("published/1.0.1");
        let store = TagHistoryStore::new(&vcs, "origin");

        store
            .create_and_push_tag("published/1.0.1", "Publishing 1.0.1")
            .unwrap();
        assert_eq!(vcs.pushed_tags(), vec!["published/1.0.1".to_string()]);
    }

    #[test]
    fn test_push_failure_surfaces() {
        let mut vcs = MockVcs::new();
        vcs.set_fail_push(true);
        let store = TagHistoryStore::new(&vcs, "origin");
        assert!(store
            .create_and_push_tag("published/1.0.0", "Publishing 1.0.0")
            .is_err());
    }
}

use crate::error::{PublishError, Result};
use crate::git::Vcs;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Mock repository for testing without actual git operations
///
/// Remote tags live in memory; pushes move a local tag into the remote set
/// and are recorded so tests can count them.
pub struct MockVcs {
    current_branch: Option<String>,
    default_branch: Option<String>,
    head_hash: String,
    origin_url: Option<String>,
    unreachable: bool,
    fail_push: bool,
    remote_tags: Mutex<BTreeSet<String>>,
    local_tags: Mutex<BTreeSet<String>>,
    pushed: Mutex<Vec<String>>,
    default_branch_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MockVcs {
    /// Create a new mock on `main`, which is also the remote default
    pub fn new() -> Self {
        MockVcs {
            current_branch: Some("main".to_string()),
            default_branch: Some("main".to_string()),
            head_hash: "abcdef1234567890abcdef1234567890abcdef12".to_string(),
            origin_url: None,
            unreachable: false,
            fail_push: false,
            remote_tags: Mutex::new(BTreeSet::new()),
            local_tags: Mutex::new(BTreeSet::new()),
            pushed: Mutex::new(Vec::new()),
            default_branch_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// A mock that behaves like a directory outside any repository
    pub fn not_a_repository() -> Self {
        let mut mock = Self::new();
        mock.current_branch = None;
        mock
    }

    /// Set the checked-out branch
    pub fn set_current_branch(&mut self, branch: impl Into<String>) {
        self.current_branch = Some(branch.into());
    }

    /// Set (or clear) the remote's default branch
    pub fn set_default_branch(&mut self, branch: Option<&str>) {
        self.default_branch = branch.map(str::to_string);
    }

    /// Set the full HEAD hash
    pub fn set_head_hash(&mut self, hash: impl Into<String>) {
        self.head_hash = hash.into();
    }

    /// Set the origin URL
    pub fn set_origin_url(&mut self, url: impl Into<String>) {
        self.origin_url = Some(url.into());
    }

    /// Make every remote operation fail with a transport error
    pub fn set_unreachable(&mut self, unreachable: bool) {
        self.unreachable = unreachable;
    }

    /// Make pushes fail
    pub fn set_fail_push(&mut self, fail: bool) {
        self.fail_push = fail;
    }

    /// Add a tag to the remote
    pub fn add_remote_tag(&mut self, name: impl Into<String>) {
        self.remote_tags
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into());
    }

    /// Add a stale local tag
    pub fn add_local_tag(&mut self, name: impl Into<String>) {
        self.local_tags
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into());
    }

    /// Tags pushed so far, in push order
    pub fn pushed_tags(&self) -> Vec<String> {
        self.pushed.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Tags currently on the remote
    pub fn remote_tags(&self) -> BTreeSet<String> {
        self.remote_tags.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of default-branch lookups served
    pub fn default_branch_calls(&self) -> usize {
        self.default_branch_calls.load(Ordering::SeqCst)
    }

    /// Number of remote tag listings served
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable {
            Err(PublishError::vcs("mock remote unreachable"))
        } else {
            Ok(())
        }
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn current_branch(&self) -> Result<String> {
        self.current_branch
            .clone()
            .ok_or_else(|| PublishError::NotARepository("mock".to_string()))
    }

    fn default_branch(&self, _remote: &str) -> Result<Option<String>> {
        self.default_branch_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Ok(None);
        }
        Ok(self.default_branch.clone())
    }

    fn short_hash(&self, len: usize) -> Result<String> {
        Ok(self.head_hash.chars().take(len).collect())
    }

    fn list_remote_tags(&self, _remote: &str) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(self
            .remote_tags
            .lock()
            .map_err(|_| PublishError::vcs("mock lock poisoned"))?
            .iter()
            .cloned()
            .collect())
    }

    fn delete_local_tag(&self, name: &str) -> Result<()> {
        self.local_tags
            .lock()
            .map_err(|_| PublishError::vcs("mock lock poisoned"))?
            .remove(name);
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, _message: &str) -> Result<()> {
        let mut local = self
            .local_tags
            .lock()
            .map_err(|_| PublishError::vcs("mock lock poisoned"))?;
        if !local.insert(name.to_string()) {
            return Err(PublishError::vcs(format!("tag '{}' already exists", name)));
        }
        Ok(())
    }

    fn push_tag(&self, _remote: &str, name: &str) -> Result<()> {
        self.check_reachable()?;
        if self.fail_push {
            return Err(PublishError::vcs("mock push rejected"));
        }
        if !self
            .local_tags
            .lock()
            .map_err(|_| PublishError::vcs("mock lock poisoned"))?
            .contains(name)
        {
            return Err(PublishError::vcs(format!("no local tag '{}'", name)));
        }
        self.remote_tags
            .lock()
            .map_err(|_| PublishError::vcs("mock lock poisoned"))?
            .insert(name.to_string());
        self.pushed
            .lock()
            .map_err(|_| PublishError::vcs("mock lock poisoned"))?
            .push(name.to_string());
        Ok(())
    }

    fn remote_url(&self, _remote: &str) -> Result<Option<String>> {
        if self.current_branch.is_none() {
            return Err(PublishError::NotARepository("mock".to_string()));
        }
        Ok(self.origin_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_defaults() {
        let vcs = MockVcs::new();
        assert_eq!(vcs.current_branch().unwrap(), "main");
        assert_eq!(vcs.default_branch("origin").unwrap(), Some("main".to_string()));
        assert_eq!(vcs.short_hash(7).unwrap(), "abcdef1");
    }

    #[test]
    fn test_mock_push_requires_local_tag() {
        let vcs = MockVcs::new();
        assert!(vcs.push_tag("origin", "published/1.0.0").is_err());
        vcs.create_annotated_tag("published/1.0.0", "Publishing 1.0.0")
            .unwrap();
        vcs.push_tag("origin", "published/1.0.0").unwrap();
        assert_eq!(vcs.pushed_tags(), vec!["published/1.0.0".to_string()]);
        assert!(vcs.remote_tags().contains("published/1.0.0"));
    }

    #[test]
    fn test_mock_unreachable() {
        let mut vcs = MockVcs::new();
        vcs.set_unreachable(true);
        assert!(vcs.list_remote_tags("origin").is_err());
        assert_eq!(vcs.default_branch("origin").unwrap(), None);
    }

    #[test]
    fn test_mock_not_a_repository() {
        let vcs = MockVcs::not_a_repository();
        assert!(vcs.current_branch().unwrap_err().is_not_a_repository());
    }
}

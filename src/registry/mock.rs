use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::ModuleIdentity;
use crate::error::{PublishError, Result};
use crate::registry::RegistryClient;

/// In-memory registry for tests
#[derive(Default)]
pub struct MockRegistry {
    versions: HashMap<ModuleIdentity, Vec<String>>,
    unavailable: bool,
    queries: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `version` for `module`
    pub fn add_version(&mut self, module: &ModuleIdentity, version: impl Into<String>) {
        self.versions
            .entry(module.clone())
            .or_default()
            .push(version.into());
    }

    /// Make every query fail
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of queries served
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl RegistryClient for MockRegistry {
    fn published_versions(&self, module: &ModuleIdentity) -> Result<Vec<String>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(PublishError::registry("mock registry unavailable"));
        }
        Ok(self.versions.get(module).cloned().unwrap_or_default())
    }
}

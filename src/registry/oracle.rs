use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::{ModuleIdentity, Version};
use crate::error::{PublishError, Result};
use crate::registry::RegistryClient;

/// Default lifetime of a cached "latest version" answer
pub const DEFAULT_CACHE_WINDOW: Duration = Duration::from_secs(60);

struct CachedLatest {
    fetched_at: Instant,
    latest: Option<Version>,
}

/// "Latest published version" probe over a [RegistryClient]
///
/// Answers are cached per module for `cache_window` so repeated lookups in
/// one invocation neither go stale mid-run nor hit the network again.
pub struct RegistryVersionOracle<C: RegistryClient> {
    client: C,
    cache_window: Duration,
    cache: Mutex<HashMap<ModuleIdentity, CachedLatest>>,
}

impl<C: RegistryClient> RegistryVersionOracle<C> {
    pub fn new(client: C, cache_window: Duration) -> Self {
        RegistryVersionOracle {
            client,
            cache_window,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Newest version the registry serves for `module`, pre-release suffix
    /// stripped; `None` when the module was never published.
    pub fn latest_version(&self, module: &ModuleIdentity) -> Result<Option<Version>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| PublishError::registry("registry cache lock poisoned"))?;

        if let Some(entry) = cache.get(module) {
            if entry.fetched_at.elapsed() < self.cache_window {
                debug!(%module, "registry cache hit");
                return Ok(entry.latest.clone());
            }
        }

        let latest = self
            .client
            .published_versions(module)?
            .iter()
            .filter_map(|raw| match Version::parse(raw) {
                Ok(version) => Some(version),
                Err(e) => {
                    warn!(%module, version = raw.as_str(), error = %e, "ignoring unparsable registry version");
                    None
                }
            })
            .map(|version| version.without_suffix())
            .max();

        debug!(%module, latest = ?latest.as_ref().map(Version::as_str), "resolved latest version");
        cache.insert(
            module.clone(),
            CachedLatest {
                fetched_at: Instant::now(),
                latest: latest.clone(),
            },
        );
        Ok(latest)
    }

    /// Latest version of each module that has one, in input order
    pub fn latest_versions(&self, modules: &[ModuleIdentity]) -> Result<Vec<Version>> {
        let mut versions = Vec::with_capacity(modules.len());
        for module in modules {
            if let Some(version) = self.latest_version(module)? {
                versions.push(version);
            }
        }
        Ok(versions)
    }
}

//! Per-invocation version resolution
//!
//! [VersionResolver] owns everything computed once per run: the publish
//! context (mode, branches, commit hash), the resolved version and the
//! project URL. Every consumer asks the same resolver, so publication
//! metadata and the tag push always see the same version.
//!
//! ```text
//! environment + Vcs --> context() --> prerelease()
//!                                        |
//!           TagHistoryStore::list_tags --+--> version() --> tag_name()
//! ```
//!
//! All values live in compute-once cells. Concurrent first access blocks
//! until the single computation finishes; a failed computation is not cached
//! and the error reaches every caller that asked.

pub mod baseline;

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{
    branch_slug, local_version, BranchContext, PreRelease, PreReleaseStyle, PublishMode,
    TagNamespace, Version,
};
use crate::error::Result;
use crate::git::{TagHistoryStore, Vcs};
use crate::metadata::http_url_from_remote;

/// Resolution settings, usually taken from [Config].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub remote: String,
    pub tags: TagNamespace,
    pub strip_prefixes: Vec<String>,
    pub prerelease_style: PreReleaseStyle,
    pub short_hash_len: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        ResolverSettings::from_config(&Config::default())
    }
}

impl ResolverSettings {
    pub fn from_config(config: &Config) -> Self {
        ResolverSettings {
            remote: config.remote.clone(),
            tags: TagNamespace::new(config.tag_prefix.clone()),
            strip_prefixes: config.branch.strip_prefixes.clone(),
            prerelease_style: config.prerelease_style,
            short_hash_len: config.short_hash_len,
        }
    }
}

/// What this invocation knows about where it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishContext {
    /// CI workspace root, when a CI marker was found
    pub ci_workspace: Option<PathBuf>,
    /// Current and default branch; absent in local mode
    pub branch: Option<BranchContext>,
    /// Abbreviated HEAD hash; only looked up for dev builds
    pub short_hash: Option<String>,
    pub mode: PublishMode,
}

impl PublishContext {
    fn local(ci_workspace: Option<PathBuf>) -> Self {
        PublishContext {
            ci_workspace,
            branch: None,
            short_hash: None,
            mode: PublishMode::Local,
        }
    }
}

/// Memoized resolution context for one invocation
pub struct VersionResolver<V: Vcs> {
    vcs: V,
    settings: ResolverSettings,
    ci_workspace: Option<PathBuf>,
    default_branch: OnceCell<Option<String>>,
    context: OnceCell<PublishContext>,
    prerelease: OnceCell<Option<PreRelease>>,
    latest_release: OnceCell<Option<Version>>,
    version: OnceCell<Version>,
    http_url: OnceCell<Option<String>>,
    warnings: Mutex<Vec<BoundaryWarning>>,
}

impl<V: Vcs> VersionResolver<V> {
    /// Create a resolver; nothing is looked up until first asked.
    ///
    /// `ci_workspace` is the detected CI workspace root, `None` for a
    /// developer machine (see [crate::domain::mode::ci_workspace_from_env]).
    pub fn new(vcs: V, settings: ResolverSettings, ci_workspace: Option<PathBuf>) -> Self {
        VersionResolver {
            vcs,
            settings,
            ci_workspace,
            default_branch: OnceCell::new(),
            context: OnceCell::new(),
            prerelease: OnceCell::new(),
            latest_release: OnceCell::new(),
            version: OnceCell::new(),
            http_url: OnceCell::new(),
            warnings: Mutex::new(Vec::new()),
        }
    }

    /// Tag store for the configured remote
    pub fn tag_store(&self) -> TagHistoryStore<'_, V> {
        TagHistoryStore::new(&self.vcs, &self.settings.remote)
    }

    /// Default branch of the remote, looked up at most once.
    pub fn default_branch(&self) -> Result<Option<&str>> {
        let default = self.default_branch.get_or_try_init(|| {
            let default = self.vcs.default_branch(&self.settings.remote)?;
            if default.is_none() {
                self.warn(BoundaryWarning::DefaultBranchUnresolved {
                    remote: self.settings.remote.clone(),
                });
            }
            Ok::<_, crate::error::PublishError>(default)
        })?;
        Ok(default.as_deref())
    }

    /// Mode, branches and commit hash for this invocation.
    ///
    /// A CI marker without a repository degrades to local mode; any other
    /// VCS failure is an error.
    pub fn context(&self) -> Result<&PublishContext> {
        self.context.get_or_try_init(|| self.compute_context())
    }

    fn compute_context(&self) -> Result<PublishContext> {
        let Some(workspace) = self.ci_workspace.clone() else {
            debug!("no CI workspace marker, local mode");
            return Ok(PublishContext::local(None));
        };

        let current = match self.vcs.current_branch() {
            Ok(current) => current,
            Err(e) if e.is_not_a_repository() => {
                self.warn(BoundaryWarning::NotUnderVersionControl {
                    path: workspace.display().to_string(),
                });
                return Ok(PublishContext::local(Some(workspace)));
            }
            Err(e) => return Err(e),
        };

        let default = self.default_branch()?.map(str::to_string);
        let branch = BranchContext::new(current, default);
        let mode = PublishMode::classify(true, &branch);
        let short_hash = match mode {
            PublishMode::Dev => Some(self.vcs.short_hash(self.settings.short_hash_len)?),
            _ => None,
        };

        info!(
            current = branch.current.as_str(),
            default = ?branch.default,
            %mode,
            "classified publish"
        );
        Ok(PublishContext {
            ci_workspace: Some(workspace),
            branch: Some(branch),
            short_hash,
            mode,
        })
    }

    /// Suffix policy for this invocation; `None` for releases and local builds.
    pub fn prerelease(&self) -> Result<Option<&PreRelease>> {
        let prerelease = self.prerelease.get_or_try_init(|| {
            let context = self.context()?;
            if context.mode != PublishMode::Dev {
                return Ok::<_, crate::error::PublishError>(None);
            }
            Ok(Some(match self.settings.prerelease_style {
                PreReleaseStyle::Rc => PreRelease::ReleaseCandidate,
                PreReleaseStyle::Dev => {
                    let current = context
                        .branch
                        .as_ref()
                        .map(|b| b.current.as_str())
                        .unwrap_or_default();
                    PreRelease::dev(
                        branch_slug(current, &self.settings.strip_prefixes),
                        context.short_hash.clone().unwrap_or_default(),
                    )
                }
            }))
        })?;
        Ok(prerelease.as_ref())
    }

    /// Latest stable version among the publish tags; `None` in local mode or
    /// without history. Available once [Self::version] has run.
    pub fn latest_release(&self) -> Option<&Version> {
        self.latest_release.get().and_then(Option::as_ref)
    }

    /// The version this invocation publishes.
    pub fn version(&self) -> Result<&Version> {
        self.version.get_or_try_init(|| self.compute_version())
    }

    fn compute_version(&self) -> Result<Version> {
        if self.context()?.mode.is_local() {
            let _ = self.latest_release.set(None);
            return Version::parse(&local_version(Utc::now()));
        }

        let existing = self.tag_store().list_tags(&self.settings.tags.prefix)?;
        for tag in &existing {
            if let Err(e) = Version::parse(tag) {
                self.warn(BoundaryWarning::IgnoredUnparsableTag {
                    tag: format!("{}{}", self.settings.tags.prefix, tag),
                    reason: e.to_string(),
                });
            }
        }

        let latest = baseline::latest_stable(&existing);
        debug!(latest = ?latest.as_ref().map(Version::as_str), "latest published release");
        let _ = self.latest_release.set(latest);

        let version = baseline::next_from_tags(&existing, self.prerelease()?)?;
        if !version.is_semver() {
            self.warn(BoundaryWarning::NonSemverVersion {
                version: version.to_string(),
            });
        }
        info!(version = version.as_str(), "resolved version");
        Ok(version)
    }

    /// Full tag name for the resolved version
    pub fn tag_name(&self) -> Result<String> {
        Ok(self.settings.tags.tag_name(self.version()?))
    }

    /// HTTPS project URL of the remote, best effort.
    ///
    /// Any VCS failure here only loses the URL; it never fails the run.
    pub fn http_url(&self) -> Option<&str> {
        self.http_url
            .get_or_init(|| match self.vcs.remote_url(&self.settings.remote) {
                Ok(Some(url)) => Some(http_url_from_remote(&url)),
                Ok(None) => {
                    self.warn(BoundaryWarning::MissingOriginUrl {
                        remote: self.settings.remote.clone(),
                    });
                    None
                }
                Err(e) => {
                    warn!(remote = self.settings.remote.as_str(), error = %e, "cannot read remote URL");
                    self.warn(BoundaryWarning::MissingOriginUrl {
                        remote: self.settings.remote.clone(),
                    });
                    None
                }
            })
            .as_deref()
    }

    /// Warnings collected so far, in the order they occurred
    pub fn warnings(&self) -> Vec<BoundaryWarning> {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn warn(&self, warning: BoundaryWarning) {
        debug!(%warning, "boundary warning");
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }
}

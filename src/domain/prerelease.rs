//! Pre-release suffixes for versions published off the default branch
//!
//! Two styles exist. `dev` names the branch and commit
//! (`1.2.3-dev-feature-x-abcdef1`) and keeps the baseline at the latest
//! release, so a dev build never outranks the next real release. `rc`
//! increments the baseline and counts candidates (`1.2.4-rc1`, `1.2.4-rc2`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PublishError, Result};

/// Configured pre-release naming style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreReleaseStyle {
    #[default]
    Dev,
    Rc,
}

impl FromStr for PreReleaseStyle {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(PreReleaseStyle::Dev),
            "rc" => Ok(PreReleaseStyle::Rc),
            other => Err(PublishError::config(format!(
                "Unknown pre-release style '{}', expected 'dev' or 'rc'",
                other
            ))),
        }
    }
}

impl fmt::Display for PreReleaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseStyle::Dev => write!(f, "dev"),
            PreReleaseStyle::Rc => write!(f, "rc"),
        }
    }
}

/// The suffix a non-release publish carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreRelease {
    /// `-dev-<branch-slug>-<short-hash>`
    Dev {
        branch_slug: String,
        short_hash: String,
    },
    /// `-rc<N>`
    ReleaseCandidate,
}

impl PreRelease {
    pub fn dev(branch_slug: impl Into<String>, short_hash: impl Into<String>) -> Self {
        PreRelease::Dev {
            branch_slug: branch_slug.into(),
            short_hash: short_hash.into(),
        }
    }

    /// Whether the baseline is incremented before the suffix is applied.
    pub fn bumps_baseline(&self) -> bool {
        matches!(self, PreRelease::ReleaseCandidate)
    }

    /// Suffix for the `attempt`-th candidate, counting from 1.
    ///
    /// Dev suffixes only gain a `-N` disambiguator from the second attempt on;
    /// rc suffixes always carry their counter.
    pub fn suffix(&self, attempt: u32) -> String {
        match self {
            PreRelease::Dev {
                branch_slug,
                short_hash,
            } => {
                let mut suffix = format!("-dev-{}-{}", branch_slug, short_hash);
                if attempt > 1 {
                    suffix.push_str(&format!("-{}", attempt));
                }
                suffix
            }
            PreRelease::ReleaseCandidate => format!("-rc{}", attempt),
        }
    }
}

/// Suffix for a release candidate string on its `attempt`-th try.
///
/// Plain releases stay bare and only get `-N` when the bare name is taken.
pub fn release_suffix(attempt: u32) -> String {
    if attempt > 1 {
        format!("-{}", attempt)
    } else {
        String::new()
    }
}

//! Next-version arithmetic
//!
//! Pure functions from "what is already published" to "what to publish
//! next". No I/O happens here; the callers bring the tag set or the registry
//! answers.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::prerelease::release_suffix;
use crate::domain::{PreRelease, Version};
use crate::error::Result;

/// Greatest stable version among `existing` (prefix already stripped).
///
/// Tags that are not stable releases (pre-release or disambiguated suffixes,
/// non-numeric final segments, unparsable names) never become the baseline.
pub fn latest_stable<'a, I>(existing: I) -> Option<Version>
where
    I: IntoIterator<Item = &'a String>,
{
    existing
        .into_iter()
        .filter_map(|raw| Version::parse(raw).ok())
        .filter(Version::is_stable)
        .max()
}

/// Baseline before any suffix: `1.0.0` without history, otherwise the latest
/// stable version, incremented when `bump` is set.
pub fn baseline(latest: Option<&Version>, bump: bool) -> Result<Version> {
    match latest {
        None => Ok(Version::initial()),
        Some(latest) if bump => latest.bump_last(),
        Some(latest) => Ok(latest.clone()),
    }
}

/// First candidate `base + suffix(n)`, n = 1, 2, ..., not already in `existing`.
///
/// `suffix` must yield a distinct string for every attempt; since `existing`
/// is finite the loop ends after at most `existing.len() + 1` attempts.
pub fn disambiguate<F>(base: &Version, existing: &BTreeSet<String>, suffix: F) -> Version
where
    F: Fn(u32) -> String,
{
    let mut attempt = 1;
    loop {
        let candidate = base.with_suffix(&suffix(attempt));
        if !existing.contains(candidate.as_str()) {
            return candidate;
        }
        debug!(candidate = candidate.as_str(), "version already published, trying next");
        attempt += 1;
    }
}

/// Next version given the published tag set.
///
/// `prerelease` is `None` for a release build. Dev builds keep the latest
/// release as their baseline so they always rank below the next release;
/// rc builds target the next release.
pub fn next_from_tags(existing: &BTreeSet<String>, prerelease: Option<&PreRelease>) -> Result<Version> {
    let latest = latest_stable(existing);
    let bump = prerelease.map_or(true, PreRelease::bumps_baseline);
    let base = baseline(latest.as_ref(), bump)?;

    Ok(match prerelease {
        Some(pre) => disambiguate(&base, existing, |attempt| pre.suffix(attempt)),
        None => disambiguate(&base, existing, release_suffix),
    })
}

/// Next version given the latest registry version of every lockstep module.
///
/// Dev candidates take the slowest module's version unchanged; releases take
/// the fastest module's version and increment it.
pub fn next_from_registry(latest: &[Version], dev: bool) -> Result<Version> {
    if dev {
        baseline(latest.iter().min(), false)
    } else {
        baseline(latest.iter().max(), true)
    }
}

use crate::error::{PublishError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A published or candidate version string.
///
/// Dot-separated segments, optionally followed by a `-` suffix
/// (`-dev-<slug>-<hash>`, `-rc<N>`, `-<N>`). The original text is kept
/// verbatim so formatting never loses information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
}

impl Version {
    /// The baseline used when nothing has been published yet.
    pub const INITIAL: &'static str = "1.0.0";

    /// Parse a version string.
    ///
    /// Only rejects input that could not be a tag name at all (empty or
    /// containing whitespace); ordering of odd segments is the comparator's job.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(PublishError::version("empty version string"));
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PublishError::version(format!(
                "Invalid version '{}': contains whitespace",
                s.escape_debug()
            )));
        }
        Ok(Version { raw: s.to_string() })
    }

    /// `1.0.0`
    pub fn initial() -> Self {
        Version {
            raw: Self::INITIAL.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Part before the first `-`.
    pub fn base(&self) -> &str {
        match self.raw.split_once('-') {
            Some((base, _)) => base,
            None => &self.raw,
        }
    }

    /// Everything after the first `-`, if any.
    pub fn suffix(&self) -> Option<&str> {
        self.raw.split_once('-').map(|(_, suffix)| suffix)
    }

    /// A version without a pre-release or disambiguator suffix whose final
    /// segment is numeric, e.g. `1.2.3` but not `1.2.3-rc1` or `1.2.x`.
    pub fn is_stable(&self) -> bool {
        if self.suffix().is_some() {
            return false;
        }
        let segments: Vec<&str> = self.raw.split('.').collect();
        segments.len() >= 2
            && segments
                .last()
                .is_some_and(|last| !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Drop the suffix, keeping only the dotted base.
    pub fn without_suffix(&self) -> Version {
        Version {
            raw: self.base().to_string(),
        }
    }

    /// Increment the final dot-separated segment of the base by one.
    pub fn bump_last(&self) -> Result<Version> {
        let base = self.base();
        let (head, last) = match base.rsplit_once('.') {
            Some((head, last)) => (Some(head), last),
            None => (None, base),
        };
        let next = last
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                PublishError::version(format!(
                    "Cannot increment '{}': last segment '{}' is not a number",
                    self.raw, last
                ))
            })?;
        let raw = match head {
            Some(head) => format!("{}.{}", head, next),
            None => next.to_string(),
        };
        Ok(Version { raw })
    }

    /// Append a raw suffix such as `-rc1`.
    pub fn with_suffix(&self, suffix: &str) -> Version {
        Version {
            raw: format!("{}{}", self.raw, suffix),
        }
    }

    /// Whether the version is also a valid SemVer 2.0 string.
    pub fn is_semver(&self) -> bool {
        semver::Version::parse(&self.raw).is_ok()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.raw, &other.raw)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Declared in ascending order. Well-formed kinds follow the byte order of
// their first character: `+`/`-` < digits < letters and `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SegmentKind {
    Malformed,
    Punctuated,
    Numeric,
    Alpha,
}

fn classify(segment: &str) -> SegmentKind {
    if segment.is_empty()
        || !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
    {
        return SegmentKind::Malformed;
    }
    match segment.as_bytes()[0] {
        b'0'..=b'9' => SegmentKind::Numeric,
        b'+' | b'-' => SegmentKind::Punctuated,
        _ => SegmentKind::Alpha,
    }
}

// Arbitrary-length digit strings, compared without parsing.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Leading digit run and the rest: `5-rc1` -> (`5`, `-rc1`).
fn split_digits(segment: &str) -> (&str, &str) {
    let end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    segment.split_at(end)
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    let (ka, kb) = (classify(a), classify(b));
    if ka != kb {
        return ka.cmp(&kb);
    }
    match ka {
        SegmentKind::Numeric => {
            let (num_a, rest_a) = split_digits(a);
            let (num_b, rest_b) = split_digits(b);
            compare_numeric(num_a, num_b).then_with(|| {
                match (rest_a.is_empty(), rest_b.is_empty()) {
                    (true, true) => Ordering::Equal,
                    // `3` is the release `3-rc1` leads up to
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => rest_a.cmp(rest_b),
                }
            })
        }
        SegmentKind::Punctuated | SegmentKind::Alpha | SegmentKind::Malformed => a.cmp(b),
    }
}

/// Total order over version strings.
///
/// Segments are split on `.` and compared pairwise. Segments starting with a
/// digit compare their leading digit runs numerically, then a bare number
/// ranks above the same number with a suffix (`3` > `3-rc1`), then the
/// suffixes compare lexicographically. Any other pair compares
/// lexicographically (`5` < `x`, `5-rc1` > `4`). Malformed segments (empty,
/// or with characters outside `[A-Za-z0-9+_-]`) rank below everything. When
/// one version is a prefix of the other the shorter one is less. Versions
/// that are numerically equal but spelled differently (`1.01` vs `1.1`) fall
/// back to byte order so that `Equal` only ever means identical strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => match compare_segment(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return a.cmp(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_numeric_segments_compare_numerically() {
        assert_eq!(compare_versions("1.9.0", "1.10.0"), Ordering::Less);
        assert_eq!(compare_versions("2.0.0", "10.0.0"), Ordering::Less);
    }

    #[test]
    fn test_shorter_prefix_is_less() {
        assert_eq!(compare_versions("1.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_versions("1.2.1", "1.2"), Ordering::Greater);
    }

    #[test]
    fn test_equal_to_itself() {
        assert_eq!(compare_versions("1.2.3", "1.2.3"), Ordering::Equal);
        assert_eq!(compare_versions("", ""), Ordering::Equal);
    }

    #[test]
    fn test_alpha_segments_compare_lexicographically() {
        assert_eq!(compare_versions("1.alpha", "1.beta"), Ordering::Less);
    }

    #[test]
    fn test_mixed_segments_compare_lexicographically() {
        assert_eq!(compare_versions("1.5", "1.x"), Ordering::Less);
        assert_eq!(compare_versions("1.a", "1.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.-x", "1.0"), Ordering::Less);
    }

    #[test]
    fn test_suffixed_segment_compares_leading_number_first() {
        assert_eq!(compare_versions("1.2.5-rc1", "1.2.4"), Ordering::Greater);
        assert_eq!(compare_versions("1.2.10-rc1", "1.2.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.2.3-rc1", "1.2.5-dev-x-abc1234"), Ordering::Less);
    }

    #[test]
    fn test_suffixed_segment_ranks_below_bare_release() {
        assert_eq!(compare_versions("1.2.3-rc1", "1.2.3"), Ordering::Less);
        assert_eq!(compare_versions("1.2.3-dev-x-abc1234", "1.2.3"), Ordering::Less);
        assert_eq!(compare_versions("1.2.3-rc1", "1.2.3-rc2"), Ordering::Less);
    }

    #[test]
    fn test_sorted_release_line() {
        let mut versions = vec![
            v("1.2.5-rc1"),
            v("1.2.4"),
            v("1.2.3-dev-x-abc1234"),
            v("1.2.3"),
            v("1.2.4-rc1"),
        ];
        versions.sort();
        let sorted: Vec<&str> = versions.iter().map(Version::as_str).collect();
        assert_eq!(
            sorted,
            vec!["1.2.3-dev-x-abc1234", "1.2.3", "1.2.4-rc1", "1.2.4", "1.2.5-rc1"]
        );
    }

    #[test]
    fn test_malformed_segments_sort_lowest() {
        assert_eq!(compare_versions("1..2", "1.0.2"), Ordering::Less);
        assert_eq!(compare_versions("1.a b", "1.a"), Ordering::Less);
        assert_eq!(compare_versions("1.$", "1.0"), Ordering::Less);
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        assert_eq!(
            compare_versions("1.99999999999999999999999", "1.100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_leading_zeros_tie_break_on_text() {
        assert_ne!(compare_versions("1.01", "1.1"), Ordering::Equal);
        assert_eq!(compare_versions("1.01", "1.2"), Ordering::Less);
    }

    #[test]
    fn test_parse_rejects_empty_and_whitespace() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1.0 .1").is_err());
    }

    #[test]
    fn test_round_trip() {
        for s in [
            "1.2.3",
            "1.2.3-dev-feature-x-abcdef1",
            "1.2.3-dev-feature-x-abcdef1-2",
            "1.2.3-rc4",
            "1.2.3-2",
            "0.local.20240102030405",
        ] {
            assert_eq!(v(s).to_string(), s);
        }
    }

    #[test]
    fn test_base_and_suffix() {
        let version = v("1.2.3-dev-feature-x-abcdef1");
        assert_eq!(version.base(), "1.2.3");
        assert_eq!(version.suffix(), Some("dev-feature-x-abcdef1"));
        assert_eq!(v("1.2.3").suffix(), None);
    }

    #[test]
    fn test_is_stable() {
        assert!(v("1.2.3").is_stable());
        assert!(v("1.2").is_stable());
        assert!(!v("1.2.3-rc1").is_stable());
        assert!(!v("1.2.3-dev-main-abc1234").is_stable());
        assert!(!v("1.2.x").is_stable());
        assert!(!v("7").is_stable());
    }

    #[test]
    fn test_bump_last() {
        assert_eq!(v("1.2.3").bump_last().unwrap(), v("1.2.4"));
        assert_eq!(v("1.2.9").bump_last().unwrap(), v("1.2.10"));
        assert_eq!(v("3").bump_last().unwrap(), v("4"));
        assert_eq!(v("1.2.3-rc1").bump_last().unwrap(), v("1.2.4"));
        assert!(v("1.2.x").bump_last().is_err());
    }

    #[test]
    fn test_max_and_min() {
        let versions = vec![v("1.0.0"), v("1.10.0"), v("1.9.3")];
        assert_eq!(versions.iter().max(), Some(&v("1.10.0")));
        assert_eq!(versions.iter().min(), Some(&v("1.0.0")));
    }

    #[test]
    fn test_is_semver() {
        assert!(v("1.2.3-dev-feature-x-abcdef1").is_semver());
        assert!(!v("0.local.20240102030405").is_semver());
    }
}

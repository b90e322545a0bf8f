// tests/version_order_test.rs
use std::cmp::Ordering;

use proptest::prelude::*;
use publish_version::domain::{compare_versions, Version};

fn version_string() -> impl Strategy<Value = String> {
    prop_oneof![
        // Plausible release and pre-release strings
        "[0-9]{1,3}(\\.[0-9]{1,3}){0,3}(-(dev|rc)[a-z0-9-]{0,8})?",
        // Published tag shapes: release, rc, dev and disambiguated candidates
        "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}(-rc[0-9]{1,2}|-dev-[a-z]{1,6}-[0-9a-f]{7}(-[2-9])?|-[2-9])?",
        // Mixed alphanumeric segments
        "[0-9a-z]{1,4}(\\.[0-9a-zA-Z]{1,4}){0,3}",
        // Anything a tag could contain, malformed segments included
        "[0-9a-z.+_~!-]{0,12}",
    ]
}

proptest! {
    #[test]
    fn prop_reflexive(a in version_string()) {
        prop_assert_eq!(compare_versions(&a, &a), Ordering::Equal);
    }

    #[test]
    fn prop_antisymmetric(a in version_string(), b in version_string()) {
        prop_assert_eq!(compare_versions(&a, &b), compare_versions(&b, &a).reverse());
    }

    #[test]
    fn prop_transitive(a in version_string(), b in version_string(), c in version_string()) {
        let mut sorted = [a, b, c];
        sorted.sort_by(|x, y| compare_versions(x, y));
        prop_assert_ne!(compare_versions(&sorted[0], &sorted[1]), Ordering::Greater);
        prop_assert_ne!(compare_versions(&sorted[1], &sorted[2]), Ordering::Greater);
        prop_assert_ne!(compare_versions(&sorted[0], &sorted[2]), Ordering::Greater);
    }

    #[test]
    fn prop_equal_only_when_identical(a in version_string(), b in version_string()) {
        prop_assert_eq!(compare_versions(&a, &b) == Ordering::Equal, a == b);
    }

    #[test]
    fn prop_prerelease_below_its_release(
        major in 0u32..100,
        minor in 0u32..100,
        patch in 0u32..100,
        suffix in "-rc[0-9]{1,2}|-dev-[a-z]{1,6}-[0-9a-f]{7}",
    ) {
        let release = format!("{}.{}.{}", major, minor, patch);
        let candidate = format!("{}{}", release, suffix);
        prop_assert_eq!(compare_versions(&candidate, &release), Ordering::Less);
    }

    #[test]
    fn prop_prerelease_above_previous_release(
        major in 0u32..100,
        minor in 0u32..100,
        patch in 1u32..100,
        suffix in "-rc[0-9]{1,2}|-dev-[a-z]{1,6}-[0-9a-f]{7}",
    ) {
        let previous = format!("{}.{}.{}", major, minor, patch - 1);
        let candidate = format!("{}.{}.{}{}", major, minor, patch, suffix);
        prop_assert_eq!(compare_versions(&candidate, &previous), Ordering::Greater);
    }

    #[test]
    fn prop_bump_is_greater(major in 0u32..1000, minor in 0u32..1000, patch in 0u32..1000) {
        let version = Version::parse(&format!("{}.{}.{}", major, minor, patch)).unwrap();
        let bumped = version.bump_last().unwrap();
        prop_assert_eq!(version.cmp(&bumped), Ordering::Less);
    }
}

#[test]
fn test_numeric_not_lexicographic() {
    assert_eq!(compare_versions("1.9.0", "1.10.0"), Ordering::Less);
}

#[test]
fn test_shorter_prefix_is_less() {
    assert_eq!(compare_versions("1.0", "1.0.1"), Ordering::Less);
    assert_eq!(compare_versions("1.2", "1.2.1"), Ordering::Less);
}

#[test]
fn test_sorting_published_history() {
    let mut versions: Vec<Version> = ["1.10.0", "1.2.3", "1.9.0", "1.2.10", "1.2"]
        .iter()
        .map(|s| Version::parse(s).unwrap())
        .collect();
    versions.sort();
    let sorted: Vec<&str> = versions.iter().map(Version::as_str).collect();
    assert_eq!(sorted, vec!["1.2", "1.2.3", "1.2.10", "1.9.0", "1.10.0"]);
}

#[test]
fn test_release_candidate_ranks_above_previous_release() {
    assert_eq!(compare_versions("1.2.5-rc1", "1.2.4"), Ordering::Greater);
    assert_eq!(compare_versions("1.2.3-dev-x-abc1234", "1.2.3"), Ordering::Less);
}

#[test]
fn test_sorting_mixed_history() {
    let mut versions: Vec<Version> = [
        "1.2.5-rc1",
        "1.2.4",
        "1.2.3-dev-feature-x-abcdef1",
        "1.2.3",
        "1.2.4-rc2",
        "1.2.4-rc1",
    ]
    .iter()
    .map(|s| Version::parse(s).unwrap())
    .collect();
    versions.sort();
    let sorted: Vec<&str> = versions.iter().map(Version::as_str).collect();
    assert_eq!(
        sorted,
        vec![
            "1.2.3-dev-feature-x-abcdef1",
            "1.2.3",
            "1.2.4-rc1",
            "1.2.4-rc2",
            "1.2.4",
            "1.2.5-rc1",
        ]
    );
}

use publish_version::boundary::BoundaryWarning;
use publish_version::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_default_branch_unresolved_display() {
    let warning = BoundaryWarning::DefaultBranchUnresolved {
        remote: "origin".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("default branch"),
        "Message should mention the default branch, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("origin"),
        "Message should contain remote 'origin', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("dev"),
        "Message should say the build is treated as dev, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_not_under_version_control_display() {
    let warning = BoundaryWarning::NotUnderVersionControl {
        path: "/builds/project".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("/builds/project"),
        "Message should contain the path, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("local version"),
        "Message should mention the local fallback, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_unparsable_tag_display() {
    let warning = BoundaryWarning::IgnoredUnparsableTag {
        tag: "published/".to_string(),
        reason: "empty version string".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Ignoring tag"),
        "Message should contain 'Ignoring tag', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("empty version string"),
        "Message should contain the reason, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_non_semver_display() {
    let warning = BoundaryWarning::NonSemverVersion {
        version: "1.2".to_string(),
    };
    assert_eq!(warning.to_string(), "Version '1.2' is not SemVer compliant");
}

#[test]
fn test_boundary_warning_missing_origin_display() {
    let warning = BoundaryWarning::MissingOriginUrl {
        remote: "origin".to_string(),
    };
    assert!(warning.to_string().contains("project URL omitted"));
}

#[test]
fn test_boundary_warning_equality() {
    let a = BoundaryWarning::MissingOriginUrl {
        remote: "origin".to_string(),
    };
    let b = a.clone();
    assert_eq!(a, b);
    assert_ne!(
        a,
        BoundaryWarning::MissingOriginUrl {
            remote: "upstream".to_string()
        }
    );
}

#[test]
fn test_display_warnings_accepts_all_variants() {
    // Visual verification test - output is printed to stderr
    ui::display_warnings(&[
        BoundaryWarning::DefaultBranchUnresolved {
            remote: "origin".to_string(),
        },
        BoundaryWarning::NonSemverVersion {
            version: "1.0".to_string(),
        },
    ]);
}

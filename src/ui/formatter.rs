//! Pure formatting functions for UI output.
//!
//! Everything here goes to stderr so stdout carries only the values other
//! tooling consumes (a version, a mode, a metadata document).

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::PublishMode;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the branch pair a release decision was made from.
///
/// # Arguments
/// * `current` - Checked-out branch (or commit hash when detached)
/// * `default` - Remote default branch, if known
pub fn display_branches(current: &str, default: Option<&str>) {
    eprintln!("  Default branch: {}", style(default.unwrap_or("unknown")).cyan());
    eprintln!("  Current branch: {}", style(current).cyan());
}

/// One-line summary of the publish mode.
pub fn mode_summary(mode: PublishMode) -> String {
    match mode {
        PublishMode::Local => "Local publish: timestamped version, no tags".to_string(),
        PublishMode::Release => "On default branch, full publish mode".to_string(),
        PublishMode::Dev => "Not on default branch, publishing a pre-release".to_string(),
    }
}

/// Display the resolved version against the latest published one.
pub fn display_resolved_version(latest: Option<&str>, version: &str) {
    match latest {
        Some(latest) => eprintln!(
            "  Latest: {}  Next: {}",
            style(latest).dim(),
            style(version).green().bold()
        ),
        None => eprintln!("  Next: {} (no earlier release)", style(version).green().bold()),
    }
}

//! User interface module - formatting of everything the CLI reports.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_branches, display_error, display_resolved_version,
    display_status, display_success, mode_summary,
};

use crate::boundary::BoundaryWarning;

/// Report every collected warning, in order.
pub fn display_warnings(warnings: &[BoundaryWarning]) {
    for warning in warnings {
        display_boundary_warning(warning);
    }
}

use std::fmt;

/// Non-fatal conditions met while resolving a version.
/// These never change the outcome but should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Remote default branch could not be determined; the build is treated as dev
    DefaultBranchUnresolved { remote: String },
    /// CI marker present but no repository found; falling back to a local version
    NotUnderVersionControl { path: String },
    /// Remote has no fetch URL, so publication metadata carries no project URL
    MissingOriginUrl { remote: String },
    /// Resolved version does not satisfy SemVer 2.0
    NonSemverVersion { version: String },
    /// Tag under the publish prefix that cannot name a version
    IgnoredUnparsableTag { tag: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::DefaultBranchUnresolved { remote } => {
                write!(
                    f,
                    "Cannot determine default branch of remote '{}', publishing as dev",
                    remote
                )
            }
            BoundaryWarning::NotUnderVersionControl { path } => {
                write!(
                    f,
                    "No git repository found at '{}', using a local version",
                    path
                )
            }
            BoundaryWarning::MissingOriginUrl { remote } => {
                write!(f, "Remote '{}' has no URL, project URL omitted", remote)
            }
            BoundaryWarning::NonSemverVersion { version } => {
                write!(f, "Version '{}' is not SemVer compliant", version)
            }
            BoundaryWarning::IgnoredUnparsableTag { tag, reason } => {
                write!(f, "Ignoring tag '{}': {}", tag, reason)
            }
        }
    }
}

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

use crate::domain::BranchContext;

/// Environment variables that mark a CI workspace, checked in order.
pub const DEFAULT_CI_ENV_VARS: [&str; 3] = ["WORKSPACE", "CI_PROJECT_DIR", "GITHUB_WORKSPACE"];

/// Prefix of versions produced by developer machines
pub const LOCAL_VERSION_PREFIX: &str = "0.local.";

/// How this invocation publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// No CI workspace: timestamped version, no tags read or written
    Local,
    /// CI on the default branch
    Release,
    /// CI on any other branch
    Dev,
}

impl PublishMode {
    /// Classify a CI build from its branch context.
    pub fn classify(ci: bool, branch: &BranchContext) -> Self {
        if !ci {
            PublishMode::Local
        } else if branch.is_default_branch() {
            PublishMode::Release
        } else {
            PublishMode::Dev
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, PublishMode::Local)
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishMode::Local => write!(f, "local"),
            PublishMode::Release => write!(f, "release"),
            PublishMode::Dev => write!(f, "dev"),
        }
    }
}

/// First CI workspace variable present, in the given priority order.
///
/// A variable set to the empty string still counts as present.
pub fn detect_ci_workspace<F>(vars: &[String], lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    vars.iter()
        .find_map(|name| lookup(name))
        .map(PathBuf::from)
}

/// Same as [`detect_ci_workspace`] against the process environment.
pub fn ci_workspace_from_env(vars: &[String]) -> Option<PathBuf> {
    detect_ci_workspace(vars, |name| std::env::var_os(name).map(|v| v.to_string_lossy().into_owned()))
}

/// `0.local.<YYYYMMDDHHMMSS>` in UTC.
pub fn local_version(now: DateTime<Utc>) -> String {
    format!("{}{}", LOCAL_VERSION_PREFIX, now.format("%Y%m%d%H%M%S"))
}

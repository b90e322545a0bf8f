/// Current and default branch of the repository being published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub current: String,
    pub default: Option<String>,
}

impl BranchContext {
    /// Create a new branch context
    pub fn new(current: impl Into<String>, default: Option<String>) -> Self {
        BranchContext {
            current: current.into(),
            default,
        }
    }

    /// True only when the default branch is known and checked out.
    ///
    /// An unknown default branch never counts as the default branch.
    pub fn is_default_branch(&self) -> bool {
        self.default.as_deref() == Some(self.current.as_str())
    }
}

/// Turn a branch name into a version-safe slug.
///
/// Every occurrence of each `strip_prefixes` entry is removed, then `/` and
/// `.` become `-`: `jira/ABC-12` -> `ABC-12`, `feature/jira/x` ->
/// `feature-x`, `feature/v1.2` -> `feature-v1-2`.
pub fn branch_slug(branch: &str, strip_prefixes: &[String]) -> String {
    let trimmed = strip_prefixes
        .iter()
        .filter(|prefix| !prefix.is_empty())
        .fold(branch.to_string(), |name, prefix| name.replace(prefix.as_str(), ""));
    trimmed.replace(['/', '.'], "-")
}

use thiserror::Error;

/// Unified error type for publish-version operations
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("VCS unavailable: {0}")]
    VcsUnavailable(String),

    #[error("Not a git repository: {0}")]
    NotARepository(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unresolved module identity: {0}")]
    UnresolvedModuleIdentity(String),

    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Publish action failed: {0}")]
    ActionFailed(String),

    #[error("Config file parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in publish-version
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    /// Create a VCS error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        PublishError::VcsUnavailable(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PublishError::Configuration(msg.into())
    }

    /// Create a module identity error with context
    pub fn module(msg: impl Into<String>) -> Self {
        PublishError::UnresolvedModuleIdentity(msg.into())
    }

    /// Create a registry error with context
    pub fn registry(msg: impl Into<String>) -> Self {
        PublishError::RegistryUnavailable(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        PublishError::InvalidVersion(msg.into())
    }

    /// Create a publish action error with context
    pub fn action(msg: impl Into<String>) -> Self {
        PublishError::ActionFailed(msg.into())
    }

    /// True when the working directory is simply not under version control.
    ///
    /// This is the only VCS failure callers may degrade from; everything else
    /// means a repository was found but could not be read or reached.
    pub fn is_not_a_repository(&self) -> bool {
        matches!(self, PublishError::NotARepository(_))
    }
}

impl From<git2::Error> for PublishError {
    fn from(e: git2::Error) -> Self {
        PublishError::VcsUnavailable(e.message().to_string())
    }
}

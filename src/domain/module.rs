use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PublishError, Result};

/// A publishable unit, identified by (group, name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleIdentity {
    pub group: String,
    pub name: String,
}

impl ModuleIdentity {
    /// Build an identity, falling back to `default_group` when no group is given.
    ///
    /// A blank or missing group or name is an error: nothing may be versioned
    /// or published without a complete identity.
    pub fn resolve(
        group: Option<&str>,
        name: Option<&str>,
        default_group: Option<&str>,
    ) -> Result<Self> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| PublishError::module("module name must be set"))?;
        let group = group
            .or(default_group)
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .ok_or_else(|| {
                PublishError::module(format!("no group set for module '{}'", name))
            })?;
        Ok(ModuleIdentity {
            group: group.to_string(),
            name: name.to_string(),
        })
    }

    /// Path of this module inside a Maven-layout repository: `com/example/lib`
    pub fn repository_path(&self) -> String {
        format!("{}/{}", self.group.replace('.', "/"), self.name)
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit() {
        let id = ModuleIdentity::resolve(Some("com.example"), Some("lib"), None).unwrap();
        assert_eq!(id.to_string(), "com.example:lib");
    }

    #[test]
    fn test_resolve_default_group() {
        let id = ModuleIdentity::resolve(None, Some("lib"), Some("org.acme")).unwrap();
        assert_eq!(id.group, "org.acme");
    }

    #[test]
    fn test_missing_name_fails() {
        let err = ModuleIdentity::resolve(Some("com.example"), None, None).unwrap_err();
        assert!(matches!(err, PublishError::UnresolvedModuleIdentity(_)));
        assert!(ModuleIdentity::resolve(Some("com.example"), Some("  "), None).is_err());
    }

    #[test]
    fn test_missing_group_fails() {
        let err = ModuleIdentity::resolve(None, Some("lib"), None).unwrap_err();
        assert!(err.to_string().contains("lib"));
    }

    #[test]
    fn test_repository_path() {
        let id = ModuleIdentity::resolve(Some("com.example.tools"), Some("lib"), None).unwrap();
        assert_eq!(id.repository_path(), "com/example/tools/lib");
    }
}

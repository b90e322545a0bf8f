use crate::domain::Version;

/// Default namespace for publish tags
pub const DEFAULT_TAG_PREFIX: &str = "published/";

/// Tag namespace marker (e.g. "published/")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNamespace {
    pub prefix: String,
}

impl TagNamespace {
    /// Create a new tag namespace
    pub fn new(prefix: impl Into<String>) -> Self {
        TagNamespace {
            prefix: prefix.into(),
        }
    }

    /// Tag name for a version
    /// Example: prefix="published/", version="1.2.3" -> "published/1.2.3"
    pub fn tag_name(&self, version: &Version) -> String {
        format!("{}{}", self.prefix, version)
    }

    /// Version part of a tag in this namespace, if it belongs to it
    pub fn strip<'a>(&self, tag: &'a str) -> Option<&'a str> {
        tag.strip_prefix(self.prefix.as_str())
    }
}

impl Default for TagNamespace {
    fn default() -> Self {
        TagNamespace::new(DEFAULT_TAG_PREFIX)
    }
}

/// Message recorded on an annotated publish tag
pub fn publish_message(version: &Version) -> String {
    format!("Publishing {}", version)
}

use std::collections::HashMap;

use crate::domain::{ModuleIdentity, PublishMode};

/// Context information passed to a module's publish command
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// Module being published
    pub module: ModuleIdentity,
    /// Resolved version for this invocation
    pub version: String,
    /// Tag that records the publish
    pub tag: String,
    pub mode: PublishMode,
    /// HTTPS project URL if known
    pub url: Option<String>,
}

impl ActionContext {
    /// Convert context to environment variables for the command
    ///
    /// Maps context fields to PUBLISH_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("PUBLISH_GROUP".to_string(), self.module.group.clone());
        env.insert("PUBLISH_NAME".to_string(), self.module.name.clone());
        env.insert("PUBLISH_VERSION".to_string(), self.version.clone());
        env.insert("PUBLISH_TAG".to_string(), self.tag.clone());
        env.insert("PUBLISH_MODE".to_string(), self.mode.to_string());

        if let Some(ref url) = self.url {
            env.insert("PUBLISH_URL".to_string(), url.clone());
        }

        env
    }
}

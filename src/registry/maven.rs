use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

use crate::domain::ModuleIdentity;
use crate::error::{PublishError, Result};
use crate::registry::RegistryClient;

static VERSION_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<version>\s*([^<\s]+)\s*</version>").expect("version element pattern is valid")
});

/// Maven-layout HTTP repository client
pub struct MavenRegistry {
    base_url: String,
    http: Client,
}

impl MavenRegistry {
    /// Create a client for the repository rooted at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("publish-version/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PublishError::registry(format!("Failed to create HTTP client: {}", e)))?;

        Ok(MavenRegistry {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn metadata_url(&self, module: &ModuleIdentity) -> String {
        format!(
            "{}/{}/maven-metadata.xml",
            self.base_url,
            module.repository_path()
        )
    }
}

impl RegistryClient for MavenRegistry {
    fn published_versions(&self, module: &ModuleIdentity) -> Result<Vec<String>> {
        let url = self.metadata_url(module);
        debug!(%module, %url, "querying registry");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| PublishError::registry(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(PublishError::registry(format!(
                "{} returned {} for {}",
                self.base_url, status, module
            )));
        }

        let body = response
            .text()
            .map_err(|e| PublishError::registry(format!("Failed to read {}: {}", url, e)))?;
        Ok(parse_metadata_versions(&body))
    }
}

/// Versions listed in a `maven-metadata.xml` document, in document order
pub fn parse_metadata_versions(xml: &str) -> Vec<String> {
    VERSION_ELEMENT
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

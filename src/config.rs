use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::domain::mode::DEFAULT_CI_ENV_VARS;
use crate::domain::{ModuleIdentity, PreReleaseStyle, DEFAULT_TAG_PREFIX};
use crate::error::{PublishError, Result};
use crate::registry::oracle::DEFAULT_CACHE_WINDOW;

/// Represents the complete configuration for publish-version.
///
/// Contains the tag namespace, the remote and CI markers used for mode
/// classification, pre-release naming, registry access and the modules
/// published together from this repository.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_ci_env_vars")]
    pub ci_env_vars: Vec<String>,

    #[serde(default)]
    pub prerelease_style: PreReleaseStyle,

    #[serde(default = "default_short_hash_len")]
    pub short_hash_len: usize,

    /// Push tags for dev pre-releases too
    #[serde(default)]
    pub push_dev_tags: bool,

    #[serde(default)]
    pub default_group: Option<String>,

    #[serde(default)]
    pub branch: BranchConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

fn default_tag_prefix() -> String {
    DEFAULT_TAG_PREFIX.to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Returns the CI workspace variables, highest priority first.
fn default_ci_env_vars() -> Vec<String> {
    DEFAULT_CI_ENV_VARS.iter().map(|s| s.to_string()).collect()
}

fn default_short_hash_len() -> usize {
    7
}

/// Branch name handling for dev suffixes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchConfig {
    /// Removed wherever they occur in the branch name before it is slugged
    #[serde(default = "default_strip_prefixes")]
    pub strip_prefixes: Vec<String>,
}

fn default_strip_prefixes() -> Vec<String> {
    vec!["jira/".to_string()]
}

impl Default for BranchConfig {
    fn default() -> Self {
        BranchConfig {
            strip_prefixes: default_strip_prefixes(),
        }
    }
}

/// Package registry consulted by `next-version`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_cache_seconds")]
    pub cache_seconds: u64,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_cache_seconds() -> u64 {
    DEFAULT_CACHE_WINDOW.as_secs()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl RegistryConfig {
    pub fn cache_window(&self) -> Duration {
        Duration::from_secs(self.cache_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            url: None,
            cache_seconds: default_cache_seconds(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// A module published from this repository and the command that publishes it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModuleConfig {
    #[serde(default)]
    pub group: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Program and arguments; run with the resolved version in the environment
    #[serde(default)]
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_prefix: default_tag_prefix(),
            remote: default_remote(),
            ci_env_vars: default_ci_env_vars(),
            prerelease_style: PreReleaseStyle::default(),
            short_hash_len: default_short_hash_len(),
            push_dev_tags: false,
            default_group: None,
            branch: BranchConfig::default(),
            registry: RegistryConfig::default(),
            modules: Vec::new(),
        }
    }
}

impl Config {
    /// Identity of a configured module, with `default_group` applied.
    pub fn module_identity(&self, module: &ModuleConfig) -> Result<ModuleIdentity> {
        ModuleIdentity::resolve(
            module.group.as_deref(),
            module.name.as_deref(),
            self.default_group.as_deref(),
        )
    }

    /// Identities of every configured module, in file order
    pub fn module_identities(&self) -> Result<Vec<ModuleIdentity>> {
        self.modules
            .iter()
            .map(|module| self.module_identity(module))
            .collect()
    }

    /// Configured module named `name`
    pub fn find_module(&self, name: &str) -> Result<&ModuleConfig> {
        self.modules
            .iter()
            .find(|module| module.name.as_deref() == Some(name))
            .ok_or_else(|| PublishError::config(format!("No module named '{}' configured", name)))
    }

    /// Reject values that would produce unusable versions or tags.
    pub fn validate(&self) -> Result<()> {
        if self.tag_prefix.trim().is_empty() {
            return Err(PublishError::config("tag_prefix must not be empty"));
        }
        if self.remote.trim().is_empty() {
            return Err(PublishError::config("remote must not be empty"));
        }
        if self.short_hash_len == 0 || self.short_hash_len > 40 {
            return Err(PublishError::config(format!(
                "short_hash_len must be between 1 and 40, got {}",
                self.short_hash_len
            )));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `publish.toml` in current directory
/// 3. `publish-version.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./publish.toml").exists() {
        fs::read_to_string("./publish.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("publish-version.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}

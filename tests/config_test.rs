// tests/config_test.rs
use publish_version::config::{load_config, Config};
use publish_version::domain::PreReleaseStyle;
use publish_version::PublishError;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.tag_prefix, "published/");
    assert_eq!(config.remote, "origin");
    assert_eq!(
        config.ci_env_vars,
        vec!["WORKSPACE", "CI_PROJECT_DIR", "GITHUB_WORKSPACE"]
    );
    assert_eq!(config.prerelease_style, PreReleaseStyle::Dev);
    assert_eq!(config.short_hash_len, 7);
    assert!(!config.push_dev_tags);
    assert_eq!(config.branch.strip_prefixes, vec!["jira/"]);
    assert_eq!(config.registry.cache_window(), Duration::from_secs(60));
    assert!(config.modules.is_empty());
}

#[test]
fn test_load_from_file() {
    let temp_file = write_config(
        r#"
tag_prefix = "release/"
prerelease_style = "rc"
default_group = "com.example"

[branch]
strip_prefixes = ["jira/", "users/"]

[registry]
url = "https://repo.example.com/maven2"
cache_seconds = 5

[[modules]]
name = "core"
command = ["./gradlew", ":core:upload"]

[[modules]]
group = "org.other"
name = "client"
command = ["./upload.sh"]
"#,
    );

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.tag_prefix, "release/");
    assert_eq!(config.prerelease_style, PreReleaseStyle::Rc);
    assert_eq!(config.remote, "origin");
    assert_eq!(config.branch.strip_prefixes.len(), 2);
    assert_eq!(config.registry.cache_seconds, 5);
    assert_eq!(config.registry.timeout_seconds, 30);

    let modules = config.module_identities().unwrap();
    assert_eq!(modules[0].to_string(), "com.example:core");
    assert_eq!(modules[1].to_string(), "org.other:client");
    assert_eq!(config.find_module("client").unwrap().command, vec!["./upload.sh"]);
}

#[test]
fn test_module_without_group_is_unresolved() {
    let temp_file = write_config(
        r#"
[[modules]]
name = "core"
"#,
    );

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    let err = config.module_identities().unwrap_err();
    assert!(matches!(err, PublishError::UnresolvedModuleIdentity(_)));
}

#[test]
fn test_unknown_prerelease_style_is_parse_error() {
    let temp_file = write_config("prerelease_style = \"beta\"\n");
    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, PublishError::ConfigParse(_)));
}

#[test]
fn test_invalid_hash_length_rejected() {
    let temp_file = write_config("short_hash_len = 0\n");
    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, PublishError::Configuration(_)));
}

#[test]
fn test_missing_explicit_file_is_io_error() {
    let err = load_config(Some("/nonexistent/publish.toml")).unwrap_err();
    assert!(matches!(err, PublishError::Io(_)));
}

#[test]
fn test_unknown_module_lookup() {
    let config = Config::default();
    assert!(matches!(
        config.find_module("nope").unwrap_err(),
        PublishError::Configuration(_)
    ));
}

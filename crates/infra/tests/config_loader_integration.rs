//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a connector from it.

use std::io::Write;

use fishbowl_infra::{config, FishbowlConnector};
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "credential": {
            "serverUrl": "https://erp.example.com/",
            "port": 28192,
            "username": "integration",
            "password": "secret",
            "appName": "Integration Suite",
            "appId": 4321
        },
        "http": {
            "timeout_seconds": 15,
            "accept_invalid_certs": true
        }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let config = result.expect("Failed to load config from JSON file");
    assert_eq!(config.credential.base_url(), "https://erp.example.com:28192");
    assert_eq!(config.credential.username, "integration");
    assert_eq!(config.credential.app_name, "Integration Suite");
    assert_eq!(config.credential.app_id, 4321);
    assert_eq!(config.http.timeout_seconds, Some(15));
    assert!(config.http.accept_invalid_certs);
    assert_eq!(config.poll.state_path, None);
}

#[test]
fn test_connector_builds_from_loaded_config() {
    let toml_content = r#"
[credential]
serverUrl = "https://erp.example.com"
username = "integration"
password = "secret"

[http]
user_agent = "fishbowl-integration"

[poll]
state_path = "fishbowl-cursors.json"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let config = result.expect("Failed to load config from TOML file");
    let connector = FishbowlConnector::from_config(config).expect("connector");

    assert_eq!(connector.config().credential.effective_port(), 443);
    assert_eq!(connector.config().http.user_agent.as_deref(), Some("fishbowl-integration"));
}

#[test]
fn test_load_config_malformed_toml() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(b"[credential\nserverUrl = ").expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let err = result.expect_err("malformed TOML must fail");
    assert!(err.to_string().contains("Invalid TOML format"));
}

//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use proxyfleet_domain::{ProxyFleetError, Scope};
use proxyfleet_infra::config;
use tempfile::TempDir;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write config file");
    path
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[cloud]
base_url = "https://api.eu-1.crowdstrike.com"
timeout_secs = 15

[credentials]
client_id = "integration-id"
client_secret = "integration-secret"

[token_cache]
path = "/var/lib/proxyfleet/token.txt"
max_age_secs = 900

[scope]
kind = "host_group"
id = "0f3c"

[proxy]
hostname = "proxy.corp.example"
port = 3128

[[stores]]
path = 'HKLM:\SYSTEM\CurrentControlSet\Services\CSAgent\Sim'
delete_keys = ["PAC", "PN"]
"#;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "proxyfleet.toml", toml_content);

    let config = config::load_from_file(Some(path)).expect("Failed to load TOML config");

    assert_eq!(config.cloud.base_url, "https://api.eu-1.crowdstrike.com");
    assert_eq!(config.cloud.timeout_secs, 15);
    assert_eq!(config.token_cache.max_age_secs, 900);
    assert_eq!(config.token_cache.path, PathBuf::from("/var/lib/proxyfleet/token.txt"));
    assert_eq!(config.scope, Scope::HostGroup { id: "0f3c".to_string() });
    assert_eq!(config.proxy.port, 3128);
    assert_eq!(config.stores.len(), 1);
    assert_eq!(config.stores[0].delete_keys, vec!["PAC".to_string(), "PN".to_string()]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_config_applies_defaults() {
    let toml_content = r#"
[cloud]
base_url = "https://api.crowdstrike.com"

[credentials]
client_id = "id"
client_secret = "secret"

[proxy]
hostname = "proxyhost.domain.com"
port = 8080
"#;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "config.toml", toml_content);

    let config = config::load_from_file(Some(path)).expect("Failed to load TOML config");

    assert_eq!(config.scope, Scope::WholeTenant);
    assert_eq!(config.token_cache.max_age_secs, 1799);
    assert_eq!(config.token_cache.path, PathBuf::from("token.txt"));
    assert_eq!(config.stores.len(), 2);
    assert!(config.stores.iter().all(|s| s.delete_keys.len() == 4));
}

#[test]
fn test_load_validates_before_returning() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

    let json_content = r#"{
        "cloud": { "base_url": "https://api.crowdstrike.com" },
        "credentials": { "client_id": "", "client_secret": "" },
        "proxy": { "hostname": "proxyhost.domain.com", "port": 8080 }
    }"#;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "proxyfleet.json", json_content);

    std::env::remove_var("PROXYFLEET_CLIENT_ID");
    std::env::remove_var("PROXYFLEET_CLIENT_SECRET");
    let result = config::load(Some(path));

    assert!(matches!(result, Err(ProxyFleetError::Config(_))));
}

#[test]
fn test_load_with_credentials_from_environment() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

    let json_content = r#"{
        "cloud": { "base_url": "https://api.crowdstrike.com" },
        "credentials": {},
        "proxy": { "hostname": "proxyhost.domain.com", "port": 8080 }
    }"#;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "proxyfleet.json", json_content);

    std::env::set_var("PROXYFLEET_CLIENT_ID", "env-id");
    std::env::set_var("PROXYFLEET_CLIENT_SECRET", "env-secret");
    let result = config::load(Some(path));
    std::env::remove_var("PROXYFLEET_CLIENT_ID");
    std::env::remove_var("PROXYFLEET_CLIENT_SECRET");

    let config = result.expect("Config with env credentials should load");
    assert_eq!(config.credentials.client_id, "env-id");
    assert_eq!(config.credentials.client_secret, "env-secret");
}

#[test]
fn test_load_config_invalid_toml() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "proxyfleet.toml", "[cloud\nbase_url = ");

    let result = config::load_from_file(Some(path));

    match result {
        Err(ProxyFleetError::Config(msg)) => assert!(msg.contains("TOML")),
        other => panic!("expected TOML config error, got {:?}", other),
    }
}

#[test]
fn test_load_config_missing_required_section() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "proxyfleet.toml",
        "[cloud]\nbase_url = \"https://api.crowdstrike.com\"\n",
    );

    let result = config::load_from_file(Some(path));

    assert!(matches!(result, Err(ProxyFleetError::Config(_))));
}

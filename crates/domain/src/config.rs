//! Run configuration
//!
//! Built once at startup and passed by reference into every component.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_KEYS_TO_DELETE, DEFAULT_REGISTRY_STORES, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TOKEN_FILENAME, DEFAULT_TOKEN_MAX_AGE_SECS,
};
use crate::errors::{ProxyFleetError, Result};
use crate::types::Scope;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub cloud: CloudConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub token_cache: TokenCacheConfig,
    #[serde(default)]
    pub scope: Scope,
    pub proxy: ProxyTarget,
    #[serde(default = "default_stores")]
    pub stores: Vec<RegistryStore>,
}

/// Endpoint-management API location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// API base URL, e.g. `https://api.crowdstrike.com`
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CloudConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// API client credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// On-disk bearer token cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCacheConfig {
    #[serde(default = "default_token_path")]
    pub path: PathBuf,
    /// Cached tokens at least this old are replaced
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl TokenCacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self { path: default_token_path(), max_age_secs: default_max_age_secs() }
    }
}

/// Proxy every targeted agent is pointed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTarget {
    pub hostname: String,
    pub port: u16,
}

/// One registry store and the stale keys cleared from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStore {
    pub path: String,
    #[serde(default = "default_delete_keys")]
    pub delete_keys: Vec<String>,
}

impl RegistryStore {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), delete_keys: default_delete_keys() }
    }
}

impl Config {
    /// Check everything that can be checked without touching the network
    ///
    /// # Errors
    /// Returns `ProxyFleetError::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.credentials.client_id.trim().is_empty()
            || self.credentials.client_secret.trim().is_empty()
        {
            return Err(ProxyFleetError::Config(
                "API client id and secret must both be configured".to_string(),
            ));
        }

        let base = url::Url::parse(&self.cloud.base_url).map_err(|e| {
            ProxyFleetError::Config(format!("Invalid base URL '{}': {}", self.cloud.base_url, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ProxyFleetError::Config(format!(
                "Base URL must be http(s): {}",
                self.cloud.base_url
            )));
        }

        if self.cloud.timeout_secs == 0 {
            return Err(ProxyFleetError::Config("Request timeout must be non-zero".to_string()));
        }

        if self.token_cache.max_age_secs == 0 {
            return Err(ProxyFleetError::Config("Token max age must be non-zero".to_string()));
        }

        if let Scope::HostGroup { id } = &self.scope {
            if id.trim().is_empty() {
                return Err(ProxyFleetError::Config(
                    "Host group scope requires a group id".to_string(),
                ));
            }
        }

        if self.proxy.hostname.trim().is_empty() {
            return Err(ProxyFleetError::Config("Proxy hostname must be set".to_string()));
        }
        if self.proxy.port == 0 {
            return Err(ProxyFleetError::Config("Proxy port must be non-zero".to_string()));
        }

        if self.stores.is_empty() {
            return Err(ProxyFleetError::Config(
                "At least one registry store must be configured".to_string(),
            ));
        }
        for store in &self.stores {
            if store.path.trim().is_empty() {
                return Err(ProxyFleetError::Config("Registry store path is empty".to_string()));
            }
            if store.delete_keys.iter().any(|k| k.trim().is_empty()) {
                return Err(ProxyFleetError::Config(format!(
                    "Empty key in delete list for store {}",
                    store.path
                )));
            }
        }

        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_token_path() -> PathBuf {
    PathBuf::from(DEFAULT_TOKEN_FILENAME)
}

fn default_max_age_secs() -> u64 {
    DEFAULT_TOKEN_MAX_AGE_SECS
}

fn default_delete_keys() -> Vec<String> {
    DEFAULT_KEYS_TO_DELETE.iter().map(ToString::to_string).collect()
}

/// Agent stores used when the configuration lists none
pub fn default_stores() -> Vec<RegistryStore> {
    DEFAULT_REGISTRY_STORES.iter().map(|path| RegistryStore::new(*path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            cloud: CloudConfig {
                base_url: "https://api.example.com".to_string(),
                timeout_secs: 30,
            },
            credentials: CredentialsConfig {
                client_id: "client".to_string(),
                client_secret: "secret".to_string(),
            },
            token_cache: TokenCacheConfig::default(),
            scope: Scope::WholeTenant,
            proxy: ProxyTarget { hostname: "proxy.example.com".to_string(), port: 8080 },
            stores: default_stores(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn missing_secret_is_config_error() {
        let mut config = valid_config();
        config.credentials.client_secret = "  ".to_string();

        assert!(matches!(config.validate(), Err(ProxyFleetError::Config(_))));
    }

    #[test]
    fn empty_group_id_is_rejected() {
        let mut config = valid_config();
        config.scope = Scope::HostGroup { id: String::new() };

        assert!(matches!(config.validate(), Err(ProxyFleetError::Config(_))));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut config = valid_config();
        config.cloud.base_url = "not a url".to_string();

        assert!(matches!(config.validate(), Err(ProxyFleetError::Config(_))));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = valid_config();
        config.proxy.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn minimal_toml_gets_defaults() {
        let config: Config = toml::from_str(
            r#"
[cloud]
base_url = "https://api.example.com"

[credentials]
client_id = "id"
client_secret = "secret"

[proxy]
hostname = "proxy.example.com"
port = 8080
"#,
        )
        .unwrap();

        assert_eq!(config.cloud.timeout_secs, 30);
        assert_eq!(config.token_cache.max_age_secs, 1799);
        assert_eq!(config.token_cache.path, PathBuf::from("token.txt"));
        assert_eq!(config.scope, Scope::WholeTenant);
        assert_eq!(config.stores.len(), 2);
        assert_eq!(config.stores[0].delete_keys, vec!["DisableProxy", "PAC", "PN", "PP"]);
    }

    #[test]
    fn debug_redacts_client_secret() {
        let rendered = format!("{:?}", valid_config());
        assert!(rendered.contains("client"));
        assert!(!rendered.contains("\"secret\""));
    }
}

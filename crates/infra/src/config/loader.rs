//! Configuration loader
//!
//! Loads the run configuration from a file, then applies environment
//! overrides, then validates it. Nothing here touches the network.
//!
//! ## Loading Strategy
//! 1. Use the explicit path if one was given (`--config`)
//! 2. Otherwise use `PROXYFLEET_CONFIG` if set
//! 3. Otherwise probe the standard locations
//! 4. Apply environment overrides
//! 5. Validate
//!
//! ## Environment Variables
//! - `PROXYFLEET_CONFIG`: Config file path
//! - `PROXYFLEET_BASE_URL`: API base URL
//! - `PROXYFLEET_CLIENT_ID`: API client id
//! - `PROXYFLEET_CLIENT_SECRET`: API client secret
//! - `PROXYFLEET_TOKEN_PATH`: Token cache file
//! - `PROXYFLEET_TOKEN_MAX_AGE`: Token max age in seconds
//! - `PROXYFLEET_GROUP_ID`: Target this host group instead of the whole
//!   tenant
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./proxyfleet.toml`, `./proxyfleet.json`, `./config.toml`,
//!    `./config.json` (current working directory)
//! 2. The same names next to the executable

use std::path::{Path, PathBuf};

use proxyfleet_domain::{Config, ProxyFleetError, Result, Scope};

pub const ENV_CONFIG_PATH: &str = "PROXYFLEET_CONFIG";
pub const ENV_BASE_URL: &str = "PROXYFLEET_BASE_URL";
pub const ENV_CLIENT_ID: &str = "PROXYFLEET_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "PROXYFLEET_CLIENT_SECRET";
pub const ENV_TOKEN_PATH: &str = "PROXYFLEET_TOKEN_PATH";
pub const ENV_TOKEN_MAX_AGE: &str = "PROXYFLEET_TOKEN_MAX_AGE";
pub const ENV_GROUP_ID: &str = "PROXYFLEET_GROUP_ID";

const CANDIDATE_NAMES: [&str; 4] =
    ["proxyfleet.toml", "proxyfleet.json", "config.toml", "config.json"];

/// Load, override, and validate the run configuration
///
/// # Errors
/// Returns `ProxyFleetError::Config` if:
/// - No config file can be found or read
/// - File format is invalid or required fields are missing
/// - An environment override has an invalid value
/// - The resulting configuration fails validation
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let path = path.or_else(|| non_empty_env(ENV_CONFIG_PATH).map(PathBuf::from));

    let mut config = load_from_file(path)?;
    apply_env_overrides(&mut config)?;
    config.validate()?;

    tracing::info!(
        base_url = %config.cloud.base_url,
        scope = %config.scope,
        stores = config.stores.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ProxyFleetError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ProxyFleetError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ProxyFleetError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ProxyFleetError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Apply `PROXYFLEET_*` overrides on top of a loaded configuration
///
/// Unset or empty variables leave the file value in place.
///
/// # Errors
/// Returns `ProxyFleetError::Config` if a numeric override does not parse.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(base_url) = non_empty_env(ENV_BASE_URL) {
        config.cloud.base_url = base_url;
    }
    if let Some(client_id) = non_empty_env(ENV_CLIENT_ID) {
        config.credentials.client_id = client_id;
    }
    if let Some(client_secret) = non_empty_env(ENV_CLIENT_SECRET) {
        config.credentials.client_secret = client_secret;
    }
    if let Some(token_path) = non_empty_env(ENV_TOKEN_PATH) {
        config.token_cache.path = PathBuf::from(token_path);
    }
    if let Some(max_age) = non_empty_env(ENV_TOKEN_MAX_AGE) {
        config.token_cache.max_age_secs = max_age.parse::<u64>().map_err(|e| {
            ProxyFleetError::Config(format!("Invalid {}: {}", ENV_TOKEN_MAX_AGE, e))
        })?;
    }
    if let Some(group_id) = non_empty_env(ENV_GROUP_ID) {
        config.scope = Scope::HostGroup { id: group_id };
    }
    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `ProxyFleetError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ProxyFleetError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ProxyFleetError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ProxyFleetError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CANDIDATE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

//! Configuration loading
//!
//! Builds the single immutable [`proxyfleet_domain::Config`] for a run from
//! a file plus environment overrides.

pub mod loader;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_file, parse_config, probe_config_paths};

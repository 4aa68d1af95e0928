//! # ProxyFleet Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP transport (reqwest)
//! - The endpoint-management API client
//! - The file-backed token cache
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `proxyfleet-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod token_store;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientConfig, ApiError};
pub use errors::InfraError;
pub use http::HttpClient;
pub use token_store::FileTokenStore;

//! Endpoint-management API adapter
//!
//! One client implements every network port the rollout needs: credential
//! exchange, host queries, and remote-response batches.

pub mod client;
pub mod errors;
mod models;

pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};

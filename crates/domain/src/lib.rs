//! # ProxyFleet Domain
//!
//! Business domain types for ProxyFleet.
//!
//! This crate contains:
//! - Domain data types (tokens, scopes, host sets, batch sessions, commands)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other ProxyFleet crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

//! # ProxyFleet Core
//!
//! Pure orchestration logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the identity, host query, and
//!   remote-response endpoints and for token persistence
//! - The authenticator, host enumerator, and batch command dispatcher
//! - The rollout runner that drives them in order
//!
//! ## Architecture Principles
//! - Only depends on `proxyfleet-domain`
//! - No HTTP, filesystem, or platform code
//! - All external dependencies via traits
//! - Every remote call is awaited before the next one is issued

pub mod auth;
pub mod dispatch;
pub mod hosts;
pub mod rollout;

// Re-export specific items to avoid ambiguity
pub use auth::ports::{IdentityProvider, TokenGrant, TokenStore};
pub use auth::Authenticator;
pub use dispatch::ports::RemoteResponder;
pub use dispatch::{build_plan, BatchDispatcher, DispatchReport};
pub use hosts::ports::{HostDirectory, HostQuery};
pub use hosts::HostEnumerator;
pub use rollout::{RolloutPorts, RolloutRunner, RunTracker};

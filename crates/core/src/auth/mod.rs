//! Bearer token acquisition
//!
//! Reuses a cached token while it is younger than the configured maximum
//! age, otherwise exchanges client credentials for a new one.

pub mod ports;
pub mod service;

pub use ports::{IdentityProvider, TokenGrant, TokenStore};
pub use service::Authenticator;

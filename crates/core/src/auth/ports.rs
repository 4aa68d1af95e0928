//! Port interfaces for authentication

use std::fmt;

use async_trait::async_trait;
use proxyfleet_domain::{CachedToken, Result};

/// Persistence slot for the most recent bearer token
///
/// The store is advisory: it reports whether it holds a token and how old
/// it is, the caller decides whether that token is still usable.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored token and its age, `None` if nothing is stored
    async fn load(&self) -> Result<Option<CachedToken>>;

    /// Replace the stored token; its age restarts at zero
    async fn store(&self, access_token: &str) -> Result<()>;
}

/// Result of a client-credentials exchange
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime declared by the identity endpoint, in seconds
    pub expires_in: u64,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Identity endpoint issuing bearer tokens
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange client credentials for a bearer token
    async fn exchange(&self, client_id: &str, client_secret: &str) -> Result<TokenGrant>;
}

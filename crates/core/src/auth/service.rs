//! Authenticator - token reuse or credential exchange

use std::sync::Arc;
use std::time::Duration;

use proxyfleet_domain::{BearerToken, CredentialsConfig, ProxyFleetError, Result};
use tracing::{info, instrument, warn};

use super::ports::{IdentityProvider, TokenStore};

/// Hands out the bearer token used for every call of a run
pub struct Authenticator {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn TokenStore>,
    client_id: String,
    client_secret: String,
}

impl Authenticator {
    /// Create a new authenticator
    ///
    /// # Errors
    /// Returns `ProxyFleetError::Config` if the client id or secret is empty,
    /// before any network attempt is possible.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn TokenStore>,
        credentials: &CredentialsConfig,
    ) -> Result<Self> {
        if credentials.client_id.trim().is_empty() || credentials.client_secret.trim().is_empty() {
            return Err(ProxyFleetError::Config(
                "API client id and secret must both be configured".to_string(),
            ));
        }

        info!(client_id = %credentials.client_id, "Using API client");

        Ok(Self {
            identity,
            store,
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
        })
    }

    /// Return a token younger than `max_age`
    ///
    /// A cached token is returned unchanged when its age is strictly below
    /// `max_age`; otherwise exactly one credential exchange is performed and
    /// the new token is written back to the store.
    ///
    /// # Errors
    /// Returns `ProxyFleetError::Auth` (or the transport error) if the
    /// exchange fails. There is no retry.
    #[instrument(skip(self), fields(max_age_secs = max_age.as_secs()))]
    pub async fn get_token(&self, max_age: Duration) -> Result<BearerToken> {
        match self.store.load().await {
            Ok(Some(cached)) => {
                info!(
                    age_secs = cached.age.as_secs(),
                    max_age_secs = max_age.as_secs(),
                    "Cached token found"
                );
                if cached.is_fresh(max_age) {
                    info!("Reusing cached token");
                    return Ok(BearerToken::from_cache(cached));
                }
                info!("Cached token too old, replacing it");
            }
            Ok(None) => info!("No cached token"),
            Err(err) => warn!(error = %err, "Token cache unreadable, treating as empty"),
        }

        self.fetch_token(max_age).await
    }

    async fn fetch_token(&self, max_age: Duration) -> Result<BearerToken> {
        info!("Fetching new token from API");

        let grant = self.identity.exchange(&self.client_id, &self.client_secret).await?;
        if grant.access_token.trim().is_empty() {
            return Err(ProxyFleetError::Auth("identity endpoint returned an empty token".into()));
        }

        info!(expires_in = grant.expires_in, "Got access token");
        if max_age.as_secs() > grant.expires_in {
            warn!(
                max_age_secs = max_age.as_secs(),
                expires_in = grant.expires_in,
                "Configured token max age exceeds the declared token lifetime"
            );
        }

        match self.store.store(&grant.access_token).await {
            Ok(()) => info!("New token cached"),
            Err(err) => warn!(error = %err, "Failed to cache new token"),
        }

        Ok(BearerToken::issued(grant.access_token, grant.expires_in))
    }
}

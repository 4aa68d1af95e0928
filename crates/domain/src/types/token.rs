//! Bearer credential types

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Bearer credential presented on every API call of a run
///
/// Tokens are never mutated; an expired token is replaced wholesale by a
/// fresh exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    access_token: String,

    /// When the token was obtained (for cached tokens, derived from the
    /// cache age)
    acquired_at: DateTime<Utc>,

    /// Lifetime declared by the identity endpoint, unknown for cached tokens
    expires_in: Option<u64>,
}

impl BearerToken {
    /// Token fresh from a credential exchange
    #[must_use]
    pub fn issued(access_token: String, expires_in: u64) -> Self {
        Self { access_token, acquired_at: Utc::now(), expires_in: Some(expires_in) }
    }

    /// Token read back from the cache, `age` old
    #[must_use]
    pub fn from_cache(cached: CachedToken) -> Self {
        let age =
            chrono::Duration::from_std(cached.age).unwrap_or_else(|_| chrono::Duration::zero());
        Self { access_token: cached.access_token, acquired_at: Utc::now() - age, expires_in: None }
    }

    /// Raw token value for the `Authorization` header
    pub fn secret(&self) -> &str {
        &self.access_token
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    /// Age of the token relative to `now`, zero if `now` precedes acquisition
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.acquired_at).to_std().unwrap_or(Duration::ZERO)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("access_token", &"<redacted>")
            .field("acquired_at", &self.acquired_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Candidate token supplied by the token cache
///
/// The cache only reports what it holds and how old it is; freshness is
/// decided by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    pub age: Duration,
}

impl CachedToken {
    pub fn new(access_token: impl Into<String>, age: Duration) -> Self {
        Self { access_token: access_token.into(), age }
    }

    /// Strict comparison: a token exactly `max_age` old is stale
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.age < max_age
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"<redacted>")
            .field("age", &self.age)
            .finish()
    }
}

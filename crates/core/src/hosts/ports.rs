//! Port interfaces for host queries

use async_trait::async_trait;
use proxyfleet_domain::{BearerToken, HostPage, Result, Scope};

/// One page request against the host directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostQuery {
    pub scope: Scope,
    /// `None` for the first page
    pub cursor: Option<String>,
    pub limit: usize,
    pub filter: String,
}

/// Cursor-paginated host identifier query
#[async_trait]
pub trait HostDirectory: Send + Sync {
    /// Fetch one page of host identifiers
    async fn query_hosts(&self, token: &BearerToken, query: &HostQuery) -> Result<HostPage>;
}

//! Exhaustive cursor-paginated host enumeration

use std::sync::Arc;

use proxyfleet_domain::constants::{HOST_PLATFORM_FILTER, HOST_QUERY_PAGE_SIZE};
use proxyfleet_domain::{BearerToken, HostIdSet, ProxyFleetError, Result, Scope};
use tracing::{info, instrument, warn};

use super::ports::{HostDirectory, HostQuery};

/// Collects every host identifier in a scope
pub struct HostEnumerator {
    directory: Arc<dyn HostDirectory>,
    page_size: usize,
}

impl HostEnumerator {
    /// Create an enumerator requesting the largest page the API allows
    pub fn new(directory: Arc<dyn HostDirectory>) -> Self {
        Self { directory, page_size: HOST_QUERY_PAGE_SIZE }
    }

    /// Override the page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Page through the scope until the server-reported total is reached
    ///
    /// Pages are requested strictly one after another. Identifiers already
    /// seen are dropped.
    ///
    /// # Errors
    /// - `ProxyFleetError::Protocol` if a page adds no new identifiers, or
    ///   carries no cursor, before the total is reached
    /// - any error from the directory, which ends enumeration
    #[instrument(skip(self, token), fields(scope = %scope))]
    pub async fn enumerate(&self, token: &BearerToken, scope: &Scope) -> Result<HostIdSet> {
        info!("Getting all hosts");

        let mut hosts = HostIdSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        let total = loop {
            let query = HostQuery {
                scope: scope.clone(),
                cursor: cursor.take(),
                limit: self.page_size,
                filter: HOST_PLATFORM_FILTER.to_string(),
            };

            let page = self.directory.query_hosts(token, &query).await?;
            pages += 1;

            let fetched = page.items.len();
            let merge = hosts.extend_page(page.items);
            if merge.duplicates > 0 {
                warn!(page = pages, duplicates = merge.duplicates, "Dropped duplicate host ids");
            }

            info!(
                page = pages,
                fetched,
                accumulated = hosts.len(),
                total = page.total,
                "Fetched host page"
            );

            if hosts.len() >= page.total {
                break page.total;
            }

            if merge.added == 0 {
                return Err(ProxyFleetError::Protocol(format!(
                    "page {} added no new hosts with {}/{} collected",
                    pages,
                    hosts.len(),
                    page.total
                )));
            }

            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => {
                    return Err(ProxyFleetError::Protocol(format!(
                        "page {} carried no cursor with {}/{} collected",
                        pages,
                        hosts.len(),
                        page.total
                    )))
                }
            }
        };

        if hosts.len() > total {
            warn!(
                collected = hosts.len(),
                total, "Collected more hosts than the reported total; keeping all of them"
            );
        }

        info!(hosts = hosts.len(), pages, "Retrieved all hosts");
        Ok(hosts)
    }
}

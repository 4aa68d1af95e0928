//! Shared test helpers for `proxyfleet-core` integration tests.
//!
//! In-memory port implementations that record every call, so tests can
//! assert on call counts and ordering without a network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use proxyfleet_core::{
    HostDirectory, HostQuery, IdentityProvider, RemoteResponder, RolloutPorts, TokenGrant,
    TokenStore,
};
use proxyfleet_domain::{
    default_stores, BatchSession, BearerToken, CachedToken, CloudConfig, CommandAck, Config,
    CredentialsConfig, HostPage, ProxyFleetError, ProxyTarget, Result, Scope, TokenCacheConfig,
};

/// Token slot with a settable age.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<CachedToken>>,
    pub stores: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn holding(token: &str, age_secs: u64) -> Self {
        Self {
            slot: Mutex::new(Some(CachedToken::new(token, Duration::from_secs(age_secs)))),
            stores: AtomicUsize::new(0),
        }
    }

    pub fn current(&self) -> Option<CachedToken> {
        self.slot.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<CachedToken>> {
        Ok(self.current())
    }

    async fn store(&self, access_token: &str) -> Result<()> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        *self.slot.lock().unwrap() = Some(CachedToken::new(access_token, Duration::ZERO));
        Ok(())
    }
}

/// Identity endpoint that always grants `token`.
pub struct FakeIdentity {
    token: String,
    pub calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn granting(token: &str) -> Self {
        Self { token: token.to_string(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn exchange(&self, _client_id: &str, _client_secret: &str) -> Result<TokenGrant> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TokenGrant { access_token: self.token.clone(), expires_in: 1799 })
    }
}

/// Serves `total` identifiers in pages of at most `query.limit`.
///
/// The cursor is the decimal offset of the next page.
pub struct PagedDirectory {
    total: usize,
    stall_at_page: Option<usize>,
    pub queries: Mutex<Vec<HostQuery>>,
    pub tokens_seen: Mutex<Vec<String>>,
}

impl PagedDirectory {
    pub fn with_hosts(total: usize) -> Self {
        Self {
            total,
            stall_at_page: None,
            queries: Mutex::new(Vec::new()),
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    /// Return an empty page (still reporting the full total) as page `n`.
    pub fn stalling_at(mut self, n: usize) -> Self {
        self.stall_at_page = Some(n);
        self
    }

    pub fn page_requests(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl HostDirectory for PagedDirectory {
    async fn query_hosts(&self, token: &BearerToken, query: &HostQuery) -> Result<HostPage> {
        let page_number = {
            let mut queries = self.queries.lock().unwrap();
            queries.push(query.clone());
            queries.len()
        };
        self.tokens_seen.lock().unwrap().push(token.secret().to_string());

        let offset = match &query.cursor {
            None => 0,
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|e| ProxyFleetError::Protocol(format!("bad cursor: {e}")))?,
        };

        if self.stall_at_page == Some(page_number) {
            return Ok(HostPage {
                items: Vec::new(),
                next_cursor: Some(offset.to_string()),
                total: self.total,
            });
        }

        let end = (offset + query.limit).min(self.total);
        Ok(HostPage {
            items: (offset..end).map(|i| format!("host-{i:05}")).collect(),
            next_cursor: Some(end.to_string()),
            total: self.total,
        })
    }
}

/// Records batch opens and command submissions; rejects submission `n`.
#[derive(Default)]
pub struct FakeResponder {
    reject: Option<(usize, u16)>,
    missing_batch_id: bool,
    offline_hosts: usize,
    pub opened: Mutex<Vec<(usize, bool)>>,
    pub submitted: Mutex<Vec<(String, String)>>,
}

impl FakeResponder {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn rejecting(n: usize, status: u16) -> Self {
        Self { reject: Some((n, status)), ..Default::default() }
    }

    pub fn without_batch_id() -> Self {
        Self { missing_batch_id: true, ..Default::default() }
    }

    pub fn with_offline_hosts(mut self, offline: usize) -> Self {
        self.offline_hosts = offline;
        self
    }

    pub fn submissions(&self) -> Vec<(String, String)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteResponder for FakeResponder {
    async fn open_batch(
        &self,
        _token: &BearerToken,
        host_ids: &[String],
        queue_offline: bool,
    ) -> Result<BatchSession> {
        self.opened.lock().unwrap().push((host_ids.len(), queue_offline));
        if self.missing_batch_id {
            return Err(ProxyFleetError::BatchOpen {
                status: 400,
                body: r#"{"errors":[{"message":"no hosts"}]}"#.to_string(),
            });
        }
        let included = host_ids.len().saturating_sub(self.offline_hosts);
        Ok(BatchSession {
            batch_id: "batch-0001".to_string(),
            requested_hosts: host_ids.len(),
            included_hosts: host_ids.iter().take(included).cloned().collect(),
        })
    }

    async fn submit_command(
        &self,
        _token: &BearerToken,
        _batch_id: &str,
        base_command: &str,
        command_line: &str,
    ) -> Result<CommandAck> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((base_command.to_string(), command_line.to_string()));
        let status = match self.reject {
            Some((n, status)) if submitted.len() == n => status,
            _ => 201,
        };
        Ok(CommandAck { status, body: String::new() })
    }
}

pub fn config() -> Config {
    Config {
        cloud: CloudConfig { base_url: "https://api.example.com".to_string(), timeout_secs: 30 },
        credentials: CredentialsConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        },
        token_cache: TokenCacheConfig { max_age_secs: 1799, ..Default::default() },
        scope: Scope::WholeTenant,
        proxy: ProxyTarget { hostname: "proxyhost.domain.com".to_string(), port: 8080 },
        stores: default_stores(),
    }
}

pub struct Harness {
    pub store: Arc<MemoryTokenStore>,
    pub identity: Arc<FakeIdentity>,
    pub directory: Arc<PagedDirectory>,
    pub responder: Arc<FakeResponder>,
}

impl Harness {
    pub fn new(
        store: MemoryTokenStore,
        directory: PagedDirectory,
        responder: FakeResponder,
    ) -> Self {
        Self {
            store: Arc::new(store),
            identity: Arc::new(FakeIdentity::granting("fresh-token")),
            directory: Arc::new(directory),
            responder: Arc::new(responder),
        }
    }

    pub fn ports(&self) -> RolloutPorts {
        RolloutPorts {
            identity: self.identity.clone(),
            token_store: self.store.clone(),
            directory: self.directory.clone(),
            responder: self.responder.clone(),
        }
    }
}

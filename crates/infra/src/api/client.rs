//! Endpoint-management API client
//!
//! Implements the identity, host directory, and remote responder ports over
//! a single [`HttpClient`]. Every call is one request; nothing is retried.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use proxyfleet_core::{HostDirectory, HostQuery, IdentityProvider, RemoteResponder, TokenGrant};
use proxyfleet_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use proxyfleet_domain::{
    BatchSession, BearerToken, CloudConfig, CommandAck, HostPage, ProxyFleetError, Result, Scope,
};
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

use super::errors::ApiError;
use super::models::{
    BatchCommandRequest, BatchInitRequest, BatchInitResponse, QueryResponse, TokenResponse,
};
use crate::errors::InfraError;
use crate::http::HttpClient;

const TOKEN_PATH: &str = "/oauth2/token";
const DEVICES_SCROLL_PATH: &str = "/devices/queries/devices-scroll/v1";
const GROUP_MEMBERS_PATH: &str = "/devices/queries/host-group-members/v1";
const BATCH_INIT_PATH: &str = "/real-time-response/combined/batch-init-session/v1";
const BATCH_COMMAND_PATH: &str = "/real-time-response/combined/batch-active-responder-command/v1";

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API (e.g., "https://api.crowdstrike.com")
    pub base_url: String,
    /// Timeout for each request
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.crowdstrike.com".to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: concat!("proxyfleet/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl From<&CloudConfig> for ApiClientConfig {
    fn from(cloud: &CloudConfig) -> Self {
        Self { base_url: cloud.base_url.clone(), timeout: cloud.timeout(), ..Default::default() }
    }
}

/// API client for one tenant
pub struct ApiClient {
    http_client: HttpClient,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the base URL does not parse or the
    /// HTTP client cannot be built
    pub fn new(config: ApiClientConfig) -> std::result::Result<Self, ApiError> {
        Url::parse(&config.base_url).map_err(|e| {
            ApiError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Ok(Self { http_client, config })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ApiError> {
        let raw = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| ApiError::Config(format!("Invalid endpoint '{raw}': {e}")))
    }

    async fn read_body(response: Response) -> Result<(StatusCode, String)> {
        let status = response.status();
        let body = response.text().await.map_err(|e| ProxyFleetError::from(InfraError::from(e)))?;
        Ok((status, body))
    }
}

#[async_trait]
impl IdentityProvider for ApiClient {
    #[instrument(skip(self, client_secret), fields(client_id = %client_id))]
    async fn exchange(&self, client_id: &str, client_secret: &str) -> Result<TokenGrant> {
        let url = self.endpoint(TOKEN_PATH)?;
        let request = self
            .http_client
            .request(Method::POST, url)
            .form(&[("client_id", client_id), ("client_secret", client_secret)]);

        let response = self.http_client.send(request).await?;
        let (status, body) = Self::read_body(response).await?;

        if !status.is_success() {
            return Err(ProxyFleetError::Auth(format!(
                "token endpoint returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ProxyFleetError::Auth(format!("token response is not valid JSON: {e}")))?;

        let access_token = parsed
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ProxyFleetError::Auth("token response has no access_token".into()))?;
        let expires_in = parsed.expires_in.unwrap_or_default();

        debug!(expires_in, "Token endpoint issued a token");
        Ok(TokenGrant { access_token, expires_in })
    }
}

#[async_trait]
impl HostDirectory for ApiClient {
    #[instrument(skip(self, token, query), fields(scope = %query.scope, cursor = ?query.cursor))]
    async fn query_hosts(&self, token: &BearerToken, query: &HostQuery) -> Result<HostPage> {
        let mut url = match &query.scope {
            Scope::WholeTenant => self.endpoint(DEVICES_SCROLL_PATH)?,
            Scope::HostGroup { id } => {
                let mut url = self.endpoint(GROUP_MEMBERS_PATH)?;
                url.query_pairs_mut().append_pair("id", id);
                url
            }
        };
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(cursor) = query.cursor.as_deref().filter(|c| !c.is_empty()) {
                pairs.append_pair("offset", cursor);
            }
            pairs.append_pair("filter", &query.filter);
        }

        let request = self.http_client.request(Method::GET, url).bearer_auth(token.secret());
        let response = self.http_client.send(request).await?;
        let (status, body) = Self::read_body(response).await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, body).into());
        }

        let envelope: QueryResponse = serde_json::from_str(&body).map_err(|e| {
            ProxyFleetError::MalformedResponse(format!("host query response is not JSON: {e}"))
        })?;

        let pagination = envelope.meta.and_then(|meta| meta.pagination).ok_or_else(|| {
            ProxyFleetError::Protocol("host query response has no pagination block".into())
        })?;
        let total = page_total(pagination.total)?;

        let items = envelope.resources.unwrap_or_default();
        let next_cursor = next_cursor(pagination.offset, items.len())?;
        debug!(fetched = items.len(), total, next_cursor = ?next_cursor, "Decoded host page");

        Ok(HostPage { items, next_cursor, total })
    }
}

/// Cursor for the page after one holding `fetched` items
///
/// Scroll endpoints hand back an opaque token; positional endpoints echo
/// the numeric offset of the page just served.
fn next_cursor(offset: Option<Value>, fetched: usize) -> Result<Option<String>> {
    let Some(offset) = offset else {
        return Ok(None);
    };
    match offset {
        Value::String(token) => Ok(Some(token)),
        Value::Number(start) => {
            let next = start
                .as_u64()
                .zip(u64::try_from(fetched).ok())
                .and_then(|(start, fetched)| start.checked_add(fetched))
                .ok_or_else(|| {
                    ProxyFleetError::Protocol(format!(
                        "page offset {start} cannot advance by {fetched}"
                    ))
                })?;
            Ok(Some(next.to_string()))
        }
        _ => Ok(None),
    }
}

/// Reported collection size; anything but a non-negative integer is a
/// broken envelope
fn page_total(total: Option<Value>) -> Result<usize> {
    let total = total.ok_or_else(|| {
        ProxyFleetError::Protocol("host query pagination block has no total".into())
    })?;
    total.as_u64().and_then(|total| usize::try_from(total).ok()).ok_or_else(|| {
        ProxyFleetError::Protocol(format!("host query pagination total {total} is not a count"))
    })
}

#[async_trait]
impl RemoteResponder for ApiClient {
    #[instrument(skip(self, token, host_ids), fields(hosts = host_ids.len()))]
    async fn open_batch(
        &self,
        token: &BearerToken,
        host_ids: &[String],
        queue_offline: bool,
    ) -> Result<BatchSession> {
        debug!("Initiating batch session");

        let url = self.endpoint(BATCH_INIT_PATH)?;
        let payload = BatchInitRequest { host_ids, queue_offline };
        let request =
            self.http_client.request(Method::POST, url).bearer_auth(token.secret()).json(&payload);

        let response = self.http_client.send(request).await?;
        let (status, body) = Self::read_body(response).await?;

        let parsed: BatchInitResponse = serde_json::from_str(&body).map_err(|e| {
            error!(status = status.as_u16(), body = %body, "Batch init response is not JSON");
            ProxyFleetError::MalformedResponse(format!(
                "batch init response (status {}) is not valid JSON: {e}",
                status.as_u16()
            ))
        })?;

        let Some(batch_id) = parsed.batch_id.filter(|id| !id.trim().is_empty()) else {
            error!(status = status.as_u16(), body = %body, "Batch init response has no batch id");
            return Err(ProxyFleetError::BatchOpen { status: status.as_u16(), body });
        };

        let included_hosts = match parsed.resources {
            Some(resources) => {
                let present: HashSet<&str> = resources.keys().map(String::as_str).collect();
                host_ids.iter().filter(|id| present.contains(id.as_str())).cloned().collect()
            }
            None => host_ids.to_vec(),
        };

        Ok(BatchSession { batch_id, requested_hosts: host_ids.len(), included_hosts })
    }

    #[instrument(
        skip(self, token, command_line),
        fields(batch_id = %batch_id, base_command = %base_command)
    )]
    async fn submit_command(
        &self,
        token: &BearerToken,
        batch_id: &str,
        base_command: &str,
        command_line: &str,
    ) -> Result<CommandAck> {
        let url = self.endpoint(BATCH_COMMAND_PATH)?;
        let payload = BatchCommandRequest { batch_id, base_command, command_string: command_line };
        let request =
            self.http_client.request(Method::POST, url).bearer_auth(token.secret()).json(&payload);

        let response = self.http_client.send(request).await?;
        let (status, body) = Self::read_body(response).await?;
        debug!(status = status.as_u16(), "Command submitted");

        Ok(CommandAck { status: status.as_u16(), body })
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.get_or_insert_with(ApiClientConfig::default).base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.get_or_insert_with(ApiClientConfig::default).timeout = timeout;
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if client creation fails
    pub fn build(self) -> std::result::Result<ApiClient, ApiError> {
        ApiClient::new(self.config.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scroll_cursor_is_passed_through() {
        let next = next_cursor(Some(json!("scroll-token-2")), 5000).unwrap();

        assert_eq!(next.as_deref(), Some("scroll-token-2"));
    }

    #[test]
    fn positional_cursor_advances_by_page_length() {
        assert_eq!(next_cursor(Some(json!(0)), 5000).unwrap().as_deref(), Some("5000"));
        assert_eq!(next_cursor(Some(json!(10000)), 2000).unwrap().as_deref(), Some("12000"));
    }

    #[test]
    fn positional_cursor_overflow_is_protocol_error() {
        let result = next_cursor(Some(json!(u64::MAX)), 1);

        assert!(matches!(result, Err(ProxyFleetError::Protocol(_))), "got {result:?}");
    }

    #[test]
    fn negative_or_fractional_offset_is_protocol_error() {
        assert!(matches!(next_cursor(Some(json!(-5)), 1), Err(ProxyFleetError::Protocol(_))));
        assert!(matches!(next_cursor(Some(json!(2.5)), 1), Err(ProxyFleetError::Protocol(_))));
    }

    #[test]
    fn missing_or_null_offset_has_no_cursor() {
        assert_eq!(next_cursor(None, 10).unwrap(), None);
        assert_eq!(next_cursor(Some(Value::Null), 10).unwrap(), None);
    }

    #[test]
    fn page_total_requires_a_count() {
        assert_eq!(page_total(Some(json!(12000))).unwrap(), 12000);
        assert!(matches!(page_total(None), Err(ProxyFleetError::Protocol(_))));
        assert!(matches!(page_total(Some(json!("many"))), Err(ProxyFleetError::Protocol(_))));
        assert!(matches!(page_total(Some(json!(-1))), Err(ProxyFleetError::Protocol(_))));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = ApiClient::builder().base_url("https://api.example.com/").build().unwrap();

        let url = client.endpoint(TOKEN_PATH).unwrap();

        assert_eq!(url.as_str(), "https://api.example.com/oauth2/token");
    }

    #[test]
    fn builder_rejects_unparseable_base_url() {
        let result = ApiClient::builder().base_url("not a url").build();

        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn config_follows_cloud_section() {
        let cloud =
            CloudConfig { base_url: "https://api.eu-1.example.com".into(), timeout_secs: 7 };

        let config = ApiClientConfig::from(&cloud);

        assert_eq!(config.base_url, "https://api.eu-1.example.com");
        assert_eq!(config.timeout, Duration::from_secs(7));
    }
}

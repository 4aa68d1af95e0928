//! Shared helpers for API client integration tests.

#![allow(dead_code)]

use proxyfleet_domain::BearerToken;
use proxyfleet_infra::ApiClient;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-bearer-token";

/// Start a mock API and a client pointed at it.
pub async fn start() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::builder().base_url(server.uri()).build().expect("api client");
    (server, client)
}

pub fn token() -> BearerToken {
    BearerToken::issued(TEST_TOKEN.to_string(), 1799)
}

/// Host ids `host-<start>` .. `host-<start + count - 1>`
pub fn host_ids(start: usize, count: usize) -> Vec<String> {
    (start..start + count).map(|i| format!("host-{i:05}")).collect()
}

/// Host query envelope
pub fn host_page(ids: &[String], offset: Value, total: usize) -> Value {
    json!({
        "meta": { "pagination": { "offset": offset, "total": total } },
        "resources": ids,
        "errors": []
    })
}

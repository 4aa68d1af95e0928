//! Wire formats of the endpoint-management API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Envelope shared by the host query endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub meta: Option<QueryMeta>,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    /// Scroll token (string) or positional offset (integer)
    #[serde(default)]
    pub offset: Option<Value>,
    /// Validated by the client so a bad count is a protocol error
    #[serde(default)]
    pub total: Option<Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchInitRequest<'a> {
    pub host_ids: &'a [String],
    pub queue_offline: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchInitResponse {
    #[serde(default)]
    pub batch_id: Option<String>,
    /// Per-host session details keyed by host id
    #[serde(default)]
    pub resources: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchCommandRequest<'a> {
    pub batch_id: &'a str,
    pub base_command: &'a str,
    pub command_string: &'a str,
}

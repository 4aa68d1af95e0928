//! API-specific error types
//!
//! Classifies failures of calls against the endpoint-management API before
//! they are folded into the domain error at the port boundary.

use proxyfleet_domain::ProxyFleetError;
use reqwest::StatusCode;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Credentials rejected (401, 403)
    Authentication,
    /// Rate limiting (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Other 4xx responses
    Client,
    /// No response at all
    Network,
    /// A response arrived but its body could not be used
    Decode,
    /// The request could not be formed
    Config,
}

/// API operation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Authentication failed (status {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error (status {status}): {body}")]
    Server { status: u16, body: String },

    #[error("Client error (status {status}): {body}")]
    Client { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        let code = status.as_u16();
        let body = body.into();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Self::Auth { status: code, body }
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimit(format!("status {code}: {body}"))
        } else if status.is_server_error() {
            Self::Server { status: code, body }
        } else {
            Self::Client { status: code, body }
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth { .. } => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Client { .. } => ApiErrorCategory::Client,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }
}

impl From<ApiError> for ProxyFleetError {
    fn from(err: ApiError) -> Self {
        match err.category() {
            ApiErrorCategory::Authentication => ProxyFleetError::Auth(err.to_string()),
            ApiErrorCategory::Decode => ProxyFleetError::MalformedResponse(err.to_string()),
            ApiErrorCategory::Config => ProxyFleetError::Config(err.to_string()),
            ApiErrorCategory::RateLimit
            | ApiErrorCategory::Server
            | ApiErrorCategory::Client
            | ApiErrorCategory::Network => ProxyFleetError::Network(err.to_string()),
        }
    }
}

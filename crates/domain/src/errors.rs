//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ProxyFleet
///
/// Every variant is fatal for the run: nothing in the rollout retries or
/// recovers, the error is reported and the process terminates.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum ProxyFleetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The request never produced a response (connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A response arrived but could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The host query violated the pagination contract.
    #[error("Enumeration protocol error: {0}")]
    Protocol(String),

    #[error("Batch session could not be opened (status {status}): {body}")]
    BatchOpen { status: u16, body: String },

    #[error("Command rejected for key '{key}' in store '{store}' (status {status}): {body}")]
    CommandRejected { store: String, key: String, status: u16, body: String },

    #[error("No target hosts: {0}")]
    NoTargets(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`ProxyFleetError`] used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Authentication,
    Transport,
    Enumeration,
    BatchOpen,
    CommandSubmit,
    Storage,
    Internal,
}

impl ProxyFleetError {
    /// Map this error onto the run-level failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Auth(_) => ErrorKind::Authentication,
            Self::Network(_) | Self::MalformedResponse(_) => ErrorKind::Transport,
            Self::Protocol(_) | Self::NoTargets(_) => ErrorKind::Enumeration,
            Self::BatchOpen { .. } => ErrorKind::BatchOpen,
            Self::CommandRejected { .. } => ErrorKind::CommandSubmit,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for ProxyFleet operations
pub type Result<T> = std::result::Result<T, ProxyFleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_rejection_names_store_and_key() {
        let err = ProxyFleetError::CommandRejected {
            store: "HKLM:\\SYSTEM\\Sim".to_string(),
            key: "PAC".to_string(),
            status: 403,
            body: "forbidden".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("PAC"));
        assert!(message.contains("HKLM:\\SYSTEM\\Sim"));
        assert!(message.contains("403"));
        assert_eq!(err.kind(), ErrorKind::CommandSubmit);
    }

    #[test]
    fn transport_and_malformed_share_a_kind_but_stay_distinct() {
        let network = ProxyFleetError::Network("connection refused".into());
        let malformed = ProxyFleetError::MalformedResponse("expected value".into());

        assert_eq!(network.kind(), ErrorKind::Transport);
        assert_eq!(malformed.kind(), ErrorKind::Transport);
        assert_ne!(network, malformed);
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = ProxyFleetError::Config("missing client id".into());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "Config");
        assert_eq!(json["detail"], "missing client id");
    }
}

//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind as IoErrorKind};

use proxyfleet_domain::ProxyFleetError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ProxyFleetError);

impl From<InfraError> for ProxyFleetError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ProxyFleetError> for InfraError {
    fn from(value: ProxyFleetError) -> Self {
        InfraError(value)
    }
}

trait IntoProxyFleetError {
    fn into_proxyfleet(self) -> ProxyFleetError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ProxyFleetError */
/* -------------------------------------------------------------------------- */

impl IntoProxyFleetError for HttpError {
    fn into_proxyfleet(self) -> ProxyFleetError {
        if self.is_timeout() {
            return ProxyFleetError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ProxyFleetError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return ProxyFleetError::MalformedResponse(format!("HTTP body decode failed: {self}"));
        }

        if self.is_builder() {
            return ProxyFleetError::Config(format!("HTTP request could not be built: {self}"));
        }

        ProxyFleetError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_proxyfleet())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → ProxyFleetError */
/* -------------------------------------------------------------------------- */

impl IntoProxyFleetError for IoError {
    fn into_proxyfleet(self) -> ProxyFleetError {
        match self.kind() {
            IoErrorKind::PermissionDenied => {
                ProxyFleetError::Storage(format!("permission denied: {self}"))
            }
            IoErrorKind::InvalidData => {
                ProxyFleetError::Storage(format!("stored token is not valid UTF-8: {self}"))
            }
            _ => ProxyFleetError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_proxyfleet())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

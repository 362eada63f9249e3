//! Session port

use std::future::Future;

use restit_domain::{DomainError, RequestSpec, ResponseSpec};
use thiserror::Error;

/// Port for performing one HTTP exchange.
///
/// This trait abstracts the transport so a test case can run against a
/// real HTTP client or a test double.
pub trait Session: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// Any status code is a successful exchange at this level; deciding
    /// which statuses are acceptable is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be performed, due to
    /// network issues, a timeout, or a malformed request.
    fn send(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, TransportError>> + Send;
}

/// Errors raised while performing or decoding an exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request URL is invalid.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The configured timeout.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a status the case does not accept.
    #[error("unexpected status {status} (expected {expected})")]
    UnexpectedStatus {
        /// The status received.
        status: u16,
        /// Description of the accepted statuses.
        expected: String,
    },

    /// The response body could not be decoded into the target type.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl From<DomainError> for TransportError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidUrl(url) => Self::InvalidUrl(url),
            other => Self::Other(other.to_string()),
        }
    }
}

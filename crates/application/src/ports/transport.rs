//! Broker transport port

use async_trait::async_trait;
use rhc_domain::{BrokerRequest, RawResponse};
use thiserror::Error;

/// Failures that happen before any HTTP response is received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The server broke the connection mid-request.
    #[error("connection interrupted: {0}")]
    ConnectionReset(String),

    /// The TLS handshake failed.
    #[error("SSL connection failed: {0}")]
    Ssl(String),

    /// The server certificate could not be verified.
    #[error("certificate verification failed: {0}")]
    Certificate(String),

    /// The connection could not be established.
    #[error("unable to connect: {0}")]
    Connect(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// True for the failures the retry policy may retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::ConnectionReset(_))
    }
}

/// Port for executing broker requests.
///
/// Implementations return every HTTP response, whatever its status;
/// only failures to obtain a response are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response was received.
    async fn send(&self, request: &BrokerRequest) -> Result<RawResponse, TransportError>;
}

//! Typed broker failures
//!
//! Every non-success outcome of a broker call becomes exactly one
//! [`BrokerError`]: a kind plus the server's message, the HTTP status it
//! came from, and (for validation failures) the offending field.

use std::fmt;

use thiserror::Error;

/// Categories of broker failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401: credentials missing or rejected.
    Unauthorized,
    /// 403: authenticated but not permitted.
    RequestDenied,
    /// 404: the resource does not exist.
    ResourceNotFound,
    /// 409/422: the request failed validation.
    Validation,
    /// 400: generic client error.
    ClientError,
    /// 500: the broker failed.
    ServerError,
    /// 503: the broker is temporarily unavailable.
    ServiceUnavailable,
    /// The request timed out; the operation may still have completed.
    Timeout,
    /// The connection broke; the operation may still have completed.
    Connection,
    /// Any other failure to reach or understand the broker.
    ResourceAccess,
    /// The resource does not expose the link needed for the operation.
    OperationNotSupported,
}

impl ErrorKind {
    /// Exit code used when the server did not supply one.
    #[must_use]
    pub const fn default_exit_code(self) -> i32 {
        match self {
            Self::Unauthorized => 97,
            Self::RequestDenied => 98,
            Self::ResourceNotFound => 101,
            Self::Validation | Self::ClientError => 1,
            Self::ServerError => 128,
            Self::ServiceUnavailable => 129,
            Self::Timeout | Self::Connection => 130,
            Self::ResourceAccess => 131,
            Self::OperationNotSupported => 132,
        }
    }

    /// Short title for display.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Unauthorized => "Not authenticated",
            Self::RequestDenied => "Request denied",
            Self::ResourceNotFound => "Not found",
            Self::Validation => "Validation failed",
            Self::ClientError => "Client error",
            Self::ServerError => "Server error",
            Self::ServiceUnavailable => "Service unavailable",
            Self::Timeout => "Timed out",
            Self::Connection => "Connection failed",
            Self::ResourceAccess => "Resource access failed",
            Self::OperationNotSupported => "Operation not supported",
        }
    }

    /// True for the "maybe happened" transport failures.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Timeout | Self::Connection)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A typed broker failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BrokerError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Human-readable message, preferably the server's text.
    pub message: String,
    /// HTTP status the error was mapped from, if any.
    pub status: Option<u16>,
    /// Exit code supplied by the server.
    pub code: Option<i32>,
    /// Field a validation error refers to.
    pub field: Option<String>,
}

impl BrokerError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            code: None,
            field: None,
        }
    }

    /// Creates a validation error for a field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: Option<String>) -> Self {
        Self {
            field,
            ..Self::new(ErrorKind::Validation, message)
        }
    }

    /// Creates an unclassified resource access error.
    #[must_use]
    pub fn resource_access(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceAccess, message)
    }

    /// Creates an error for a missing resource link.
    #[must_use]
    pub fn operation_not_supported(rel: &str) -> Self {
        Self::new(
            ErrorKind::OperationNotSupported,
            format!("The server does not support this operation ({rel})."),
        )
    }

    /// Records the HTTP status.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Records the server exit code.
    #[must_use]
    pub const fn with_code(mut self, code: Option<i32>) -> Self {
        self.code = code;
        self
    }

    /// Appends text to the message, space-separated.
    pub fn append(&mut self, text: &str) {
        if !self.message.is_empty() {
            self.message.push(' ');
        }
        self.message.push_str(text);
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code
            .filter(|code| *code != 0)
            .unwrap_or_else(|| self.kind.default_exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_is_message() {
        let error = BrokerError::new(ErrorKind::ResourceNotFound, "not found").with_status(404);
        assert_eq!(error.to_string(), "not found");
        assert_eq!(error.status, Some(404));
    }

    #[test]
    fn test_append_space_separates() {
        let mut error = BrokerError::validation("too short", Some("name".to_string()));
        error.append("must be alphanumeric");
        assert_eq!(error.message, "too short must be alphanumeric");
        assert_eq!(error.field.as_deref(), Some("name"));
    }

    #[test]
    fn test_exit_code_prefers_server_code() {
        let error = BrokerError::new(ErrorKind::Validation, "taken").with_code(Some(103));
        assert_eq!(error.exit_code(), 103);

        let error = BrokerError::new(ErrorKind::ResourceNotFound, "gone");
        assert_eq!(error.exit_code(), 101);

        let error = BrokerError::new(ErrorKind::ServerError, "boom").with_code(Some(0));
        assert_eq!(error.exit_code(), 128);
    }

    #[test]
    fn test_transient_kinds() {
        assert!(ErrorKind::Timeout.is_transient());
        assert!(ErrorKind::Connection.is_transient());
        assert!(!ErrorKind::ResourceAccess.is_transient());
    }
}

//! Domain error types

use thiserror::Error;

/// Errors raised while validating local input or decoding broker data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A link named a method the client cannot follow.
    #[error("unsupported link method: {0}")]
    UnsupportedMethod(String),

    /// A gear SSH URL could not be turned into a connectable target.
    #[error("invalid SSH URL: {0}")]
    InvalidSshUrl(String),

    /// A configuration line could not be parsed.
    #[error("invalid configuration line {line}: {content}")]
    InvalidConfigLine {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// An environment variable assignment is malformed.
    #[error("invalid environment variable: {0}")]
    InvalidEnvironmentVariable(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

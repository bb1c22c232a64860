//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while building test cases and requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A test case declared no acceptable status codes.
    #[error("test case '{0}' has an empty expected status set")]
    EmptyExpectedStatus(String),

    /// The request body could not be used as a JSON payload.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A recorded result contradicts its own outcome.
    #[error("inconsistent result for '{0}': an errored attempt cannot pass")]
    InconsistentResult(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

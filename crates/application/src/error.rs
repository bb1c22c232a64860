//! Application error types

use gatecheck_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
///
/// These abort a run. Per-endpoint failures never surface here; they are
/// recorded in the corresponding `TestResult`.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_is_wrapped() {
        let err: ApplicationError = DomainError::EmptyExpectedStatus("Weapons".into()).into();
        assert!(err.to_string().starts_with("domain error: "));
    }
}

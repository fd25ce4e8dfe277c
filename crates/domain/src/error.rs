//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The environment name is not one of the known environments.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// The service name does not match any configured service.
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// The test tag is not recognised.
    #[error("unknown test tag: {0}")]
    UnknownTag(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

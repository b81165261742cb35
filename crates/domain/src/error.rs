//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The application identifier is zero or empty.
    #[error("application identifier is required")]
    InvalidIdentity,

    /// A static token source was built without a token.
    #[error("token not provided")]
    EmptyToken,
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

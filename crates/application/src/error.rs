//! Application error types

use ghauth_domain::DomainError;
use thiserror::Error;

/// Errors surfaced by token sources and the API client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A configuration value failed domain validation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The signing key could not be decoded.
    #[error("failed to parse private key: {0}")]
    KeyParse(String),

    /// The application token could not be signed.
    #[error("failed to sign application token: {0}")]
    Signing(String),

    /// The base URL or endpoint URL could not be built.
    #[error("failed to parse URL: {0}")]
    UrlParse(String),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// The HTTP request could not be issued or its body could not be read.
    #[error("failed to execute request: {0}")]
    Request(String),

    /// The HTTP request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// The API answered with an unexpected status code.
    #[error("GitHub API returned status {status}: {body}")]
    ApiStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The success response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Broad classification of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad identity, key or token. Retrying will not help.
    Configuration,
    /// Network failure or malformed URL. The caller may retry.
    Transport,
    /// Unexpected status or undecodable response.
    Protocol,
}

impl AuthError {
    /// Returns the error's classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::KeyParse(_) | Self::Signing(_) => ErrorKind::Configuration,
            Self::UrlParse(_) | Self::Request(_) | Self::Timeout { .. } => ErrorKind::Transport,
            Self::Encode(_) | Self::ApiStatus { .. } | Self::Decode(_) => ErrorKind::Protocol,
        }
    }

    /// Returns the HTTP status code for API status errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ApiStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for token operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AuthError::from(DomainError::EmptyToken).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            AuthError::Request("connection refused".to_string()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            AuthError::ApiStatus {
                status: 500,
                body: String::new()
            }
            .kind(),
            ErrorKind::Protocol
        );
    }

    #[test]
    fn test_api_status_message_keeps_body() {
        let error = AuthError::ApiStatus {
            status: 404,
            body: r#"{"message":"Not Found"}"#.to_string(),
        };
        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.to_string(),
            r#"GitHub API returned status 404: {"message":"Not Found"}"#
        );
    }
}

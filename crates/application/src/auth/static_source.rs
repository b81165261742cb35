//! Static token source for pre-issued tokens.

use std::fmt;

use async_trait::async_trait;
use ghauth_domain::{Credential, DomainError};

use crate::AuthResult;
use crate::ports::TokenSource;

/// Returns the same pre-issued token on every call, with no expiry.
///
/// Suited to personal access tokens (classic or fine-grained), which stay
/// valid until revoked. An empty token fails on every call; a token made only
/// of whitespace is passed through unchanged.
#[derive(Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    /// Creates a source for `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> AuthResult<Credential> {
        if self.token.is_empty() {
            return Err(DomainError::EmptyToken.into());
        }
        Ok(Credential::bearer(self.token.clone(), None))
    }
}

impl fmt::Debug for StaticTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenSource")
            .field("token", &"<redacted>")
            .finish()
    }
}

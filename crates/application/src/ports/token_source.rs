//! Token source port

use std::sync::Arc;

use async_trait::async_trait;
use ghauth_domain::Credential;

use crate::AuthResult;

/// Anything that can produce a currently valid [`Credential`].
///
/// Application tokens, installation tokens and static tokens all implement
/// this; `ReuseTokenSource` wraps any of them to add expiry-aware caching.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential cannot be produced.
    async fn token(&self) -> AuthResult<Credential>;
}

#[async_trait]
impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    async fn token(&self) -> AuthResult<Credential> {
        (**self).token().await
    }
}

#[async_trait]
impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    async fn token(&self) -> AuthResult<Credential> {
        (**self).token().await
    }
}

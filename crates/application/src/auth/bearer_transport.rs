//! Transport decorator that authenticates outbound requests.

use std::fmt;

use async_trait::async_trait;
use ghauth_domain::{ApiRequest, ApiResponse};

use crate::AuthResult;
use crate::ports::{HttpTransport, TokenSource};

/// Header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Wraps a transport so every request carries `Authorization: Bearer <token>`
/// obtained from `source`.
///
/// The source is asked for a token on every request; wrap it in a
/// [`ReuseTokenSource`](crate::auth::ReuseTokenSource) to avoid minting a
/// new one each time. Any existing `Authorization` header is replaced.
pub struct BearerTransport<T, S> {
    inner: T,
    source: S,
}

impl<T: HttpTransport, S: TokenSource> BearerTransport<T, S> {
    /// Decorates `inner` with credentials from `source`.
    #[must_use]
    pub const fn new(inner: T, source: S) -> Self {
        Self { inner, source }
    }
}

#[async_trait]
impl<T: HttpTransport, S: TokenSource> HttpTransport for BearerTransport<T, S> {
    async fn send(&self, mut request: ApiRequest) -> AuthResult<ApiResponse> {
        let credential = self.source.token().await?;
        request.set_header(AUTHORIZATION_HEADER, credential.authorization_header());
        self.inner.send(request).await
    }
}

impl<T, S> fmt::Debug for BearerTransport<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTransport").finish_non_exhaustive()
    }
}

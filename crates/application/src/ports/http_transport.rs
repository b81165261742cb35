//! HTTP transport port

use std::sync::Arc;

use async_trait::async_trait;
use ghauth_domain::{ApiRequest, ApiResponse};

use crate::AuthResult;

/// Port for executing HTTP requests.
///
/// Implementations perform the physical call and may be decorated, e.g. to
/// attach a bearer credential to every outbound request. Transports are
/// shared across tasks and must be safe for concurrent use.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes a request and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be issued or times out.
    /// Non-2xx statuses are not errors at this layer.
    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        (**self).send(request).await
    }
}

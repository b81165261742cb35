//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port on top of a pooled
//! `reqwest::Client`. Each transport owns its own client; nothing is shared
//! process-wide.

use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use ghauth_application::{AuthError, AuthResult, HttpTransport};
use ghauth_domain::{ApiRequest, ApiResponse, HttpMethod};
use reqwest::{Client, Method};

/// User-Agent sent with every request. GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("ghauth/", env!("CARGO_PKG_VERSION"));

/// HTTP transport using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a fresh connection pool.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - TCP keep-alive: 30 seconds
    /// - Idle connections dropped after 90 seconds
    /// - Up to `available_parallelism + 1` idle connections per host
    /// - Proxy taken from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> AuthResult<Self> {
        let idle_per_host = std::thread::available_parallelism().map_or(1, NonZeroUsize::get) + 1;

        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(idle_per_host)
            .build()
            .map_err(|e| AuthError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Creates a transport around a caller-configured reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }

    /// Maps reqwest errors to `AuthError`.
    fn map_error(error: &reqwest::Error) -> AuthError {
        let host = error
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string();

        if error.is_connect() {
            return AuthError::Request(format!("connection to {host} failed: {error}"));
        }
        if error.is_timeout() {
            return AuthError::Request(format!("request to {host} timed out: {error}"));
        }
        if error.is_builder() {
            return AuthError::Request(format!("invalid request: {error}"));
        }

        AuthError::Request(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        tracing::trace!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Request(format!("failed to read body: {e}")))?
            .to_vec();

        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use url::Url;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[tokio::test]
    async fn test_send_passes_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("x-custom", "value"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .and(body_string("payload"))
            .respond_with(ResponseTemplate::new(202).set_body_string("accepted"))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/echo", server.uri())).unwrap();
        let request = ApiRequest::new(HttpMethod::Post, url)
            .header("X-Custom", "value")
            .body(b"payload".to_vec());

        let transport = ReqwestTransport::new().unwrap();
        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status, 202);
        assert_eq!(response.text(), "accepted");
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let response = ReqwestTransport::new()
            .unwrap()
            .send(ApiRequest::new(HttpMethod::Get, url))
            .await
            .unwrap();
        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_request_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
        let error = ReqwestTransport::new()
            .unwrap()
            .send(ApiRequest::new(HttpMethod::Get, url))
            .await
            .unwrap_err();
        assert!(matches!(error, AuthError::Request(_)));
    }
}

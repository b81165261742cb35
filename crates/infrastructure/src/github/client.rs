//! Minimal GitHub REST client for creating installation access tokens.
//!
//! API documentation:
//! <https://docs.github.com/en/rest/apps/apps#create-an-installation-access-token-for-an-app>

use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use ghauth_application::{AuthError, AuthResult, HttpTransport};
use ghauth_domain::{ApiRequest, HttpMethod, InstallationToken, InstallationTokenOptions};
use url::Url;

/// Default GitHub API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com/";

/// Media type GitHub recommends for REST requests.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Path under which GitHub Enterprise Server exposes the REST API.
const ENTERPRISE_API_PATH: &str = "/api/v3/";

#[allow(clippy::expect_used)]
static DEFAULT_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_BASE_URL).expect("valid URL"));

/// Client for the one API call the token sources need.
///
/// The client performs no authentication itself: the transport it is given is
/// expected to attach the application token (see
/// [`BearerTransport`](ghauth_application::BearerTransport)).
#[derive(Clone)]
pub struct GitHubClient {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    timeout: Option<Duration>,
}

impl GitHubClient {
    /// Creates a client for `https://api.github.com/`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: DEFAULT_URL.clone(),
            transport,
            timeout: None,
        }
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Uses `base_url` verbatim (a trailing slash is added if missing).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UrlParse`] if the URL is invalid.
    pub fn with_base_url(mut self, base_url: &str) -> AuthResult<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Points the client at a GitHub Enterprise Server host.
    ///
    /// A bare host such as `https://ghes.example.com` gets the conventional
    /// `/api/v3/` path. URLs that already carry a path, and hosts that are
    /// already API hosts (`api.` prefix or `.api.` label), are kept as given.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UrlParse`] if the URL is invalid.
    pub fn with_enterprise_url(mut self, base_url: &str) -> AuthResult<Self> {
        let mut url = parse_base_url(base_url)?;

        let host = url.host_str().unwrap_or_default();
        let is_api_host = host.starts_with("api.") || host.contains(".api.");
        if url.path() == "/" && !is_api_host {
            url.set_path(ENTERPRISE_API_PATH);
        }

        self.base_url = url;
        Ok(self)
    }

    /// Fails requests that take longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Creates an installation access token.
    ///
    /// `options` of `None` sends no body, requesting the installation's full
    /// scope.
    ///
    /// # Errors
    ///
    /// - [`AuthError::UrlParse`] if the endpoint URL cannot be built
    /// - [`AuthError::Encode`] if `options` cannot be serialized
    /// - [`AuthError::Request`] or [`AuthError::Timeout`] if the call fails
    /// - [`AuthError::ApiStatus`] for any status other than 200 or 201
    /// - [`AuthError::Decode`] if the success body is not a token
    pub async fn create_installation_token(
        &self,
        installation_id: i64,
        options: Option<&InstallationTokenOptions>,
    ) -> AuthResult<InstallationToken> {
        let endpoint = format!("app/installations/{installation_id}/access_tokens");
        let url = self.base_url.join(&endpoint).map_err(invalid_endpoint)?;

        let mut request = ApiRequest::new(HttpMethod::Post, url)
            .header("Accept", GITHUB_MEDIA_TYPE)
            .header("Content-Type", "application/json");

        if let Some(options) = options {
            let body = serde_json::to_vec(options).map_err(encode_error)?;
            request = request.body(body);
        }

        tracing::debug!(installation_id, "requesting installation access token");

        let response = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.transport.send(request))
                .await
                .map_err(|_| AuthError::Timeout {
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })??,
            None => self.transport.send(request).await?,
        };

        tracing::debug!(
            installation_id,
            status = response.status,
            "installation access token response"
        );

        if !is_token_issued(response.status) {
            return Err(AuthError::ApiStatus {
                status: response.status,
                body: response.text(),
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| AuthError::Decode(e.to_string()))
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Statuses that carry a newly issued token.
const fn is_token_issued(status: u16) -> bool {
    matches!(status, 200 | 201)
}

fn invalid_endpoint(error: url::ParseError) -> AuthError {
    AuthError::UrlParse(format!("failed to parse endpoint URL: {error}"))
}

fn invalid_base_url(detail: impl fmt::Display) -> AuthError {
    AuthError::UrlParse(format!("failed to parse base URL: {detail}"))
}

fn encode_error(error: serde_json::Error) -> AuthError {
    AuthError::Encode(error.to_string())
}

/// Parses a base URL and makes sure its path ends with a slash, so relative
/// endpoints join under it instead of replacing its last segment.
fn parse_base_url(raw: &str) -> AuthResult<Url> {
    if raw.chars().any(char::is_control) {
        return Err(invalid_base_url(format!("control character in {raw:?}")));
    }

    let mut url = Url::parse(raw).map_err(invalid_base_url)?;
    if url.cannot_be_a_base() {
        return Err(invalid_base_url(format!("{raw} cannot be a base")));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

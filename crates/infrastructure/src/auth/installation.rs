//! GitHub App installation access tokens.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ghauth_application::{
    AuthResult, BearerTransport, HttpTransport, ReuseTokenSource, TokenSource,
};
use ghauth_domain::{Credential, InstallationTokenOptions};

use crate::adapters::ReqwestTransport;
use crate::github::GitHubClient;

/// Exchanges an application token for installation access tokens.
///
/// Each call to [`TokenSource::token`] creates a new installation token;
/// wrap the source in a [`ReuseTokenSource`] to reuse it until it nears
/// expiry.
pub struct InstallationTokenSource {
    id: i64,
    client: GitHubClient,
    options: Option<InstallationTokenOptions>,
}

impl InstallationTokenSource {
    /// Starts building a source for installation `id`, authenticated with
    /// tokens from `app_source`.
    #[must_use]
    pub fn builder<S>(id: i64, app_source: S) -> InstallationTokenSourceBuilder
    where
        S: TokenSource + 'static,
    {
        InstallationTokenSourceBuilder::new(id, app_source)
    }

    /// Returns the installation ID.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the scoping options sent with each request.
    #[must_use]
    pub const fn options(&self) -> Option<&InstallationTokenOptions> {
        self.options.as_ref()
    }

    /// Returns the underlying API client.
    #[must_use]
    pub const fn client(&self) -> &GitHubClient {
        &self.client
    }
}

#[async_trait]
impl TokenSource for InstallationTokenSource {
    async fn token(&self) -> AuthResult<Credential> {
        let token = self
            .client
            .create_installation_token(self.id, self.options.as_ref())
            .await?;

        tracing::debug!(
            installation_id = self.id,
            expires_at = %token.expires_at,
            "obtained installation token"
        );

        Ok(Credential::bearer(token.token, Some(token.expires_at)))
    }
}

impl fmt::Debug for InstallationTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationTokenSource")
            .field("id", &self.id)
            .field("client", &self.client)
            .field("options", &self.options)
            .finish()
    }
}

/// Builder for [`InstallationTokenSource`].
pub struct InstallationTokenSourceBuilder {
    id: i64,
    app_source: Arc<dyn TokenSource>,
    options: Option<InstallationTokenOptions>,
    transport: Option<Arc<dyn HttpTransport>>,
    base_url: Option<BaseUrl>,
    timeout: Option<Duration>,
}

enum BaseUrl {
    Verbatim(String),
    Enterprise(String),
}

impl InstallationTokenSourceBuilder {
    fn new<S>(id: i64, app_source: S) -> Self
    where
        S: TokenSource + 'static,
    {
        Self {
            id,
            app_source: Arc::new(app_source),
            options: None,
            transport: None,
            base_url: None,
            timeout: None,
        }
    }

    /// Scopes every token to `options`.
    #[must_use]
    pub fn with_options(mut self, options: InstallationTokenOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Sends requests through `transport` instead of a fresh reqwest client.
    ///
    /// The application token is still attached on top of this transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Targets a GitHub Enterprise Server host.
    ///
    /// See [`GitHubClient::with_enterprise_url`] for how the URL is normalized.
    #[must_use]
    pub fn with_enterprise_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(BaseUrl::Enterprise(url.into()));
        self
    }

    /// Targets `url` as given, without enterprise normalization.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(BaseUrl::Verbatim(url.into()));
        self
    }

    /// Fails token requests that take longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the source.
    ///
    /// The application source is wrapped in a [`ReuseTokenSource`] so one
    /// JWT serves many installation token requests.
    ///
    /// # Errors
    ///
    /// - [`AuthError::UrlParse`](ghauth_application::AuthError::UrlParse) if
    ///   the base URL is invalid
    /// - [`AuthError::Request`](ghauth_application::AuthError::Request) if the
    ///   default HTTP client cannot be created
    pub fn build(self) -> AuthResult<InstallationTokenSource> {
        let base: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let authenticated = BearerTransport::new(base, ReuseTokenSource::new(self.app_source));

        let mut client = GitHubClient::new(Arc::new(authenticated));
        client = match self.base_url {
            Some(BaseUrl::Enterprise(url)) => client.with_enterprise_url(&url)?,
            Some(BaseUrl::Verbatim(url)) => client.with_base_url(&url)?,
            None => client,
        };
        if let Some(timeout) = self.timeout {
            client = client.with_timeout(timeout);
        }

        Ok(InstallationTokenSource {
            id: self.id,
            client,
            options: self.options,
        })
    }
}

impl fmt::Debug for InstallationTokenSourceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationTokenSourceBuilder")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

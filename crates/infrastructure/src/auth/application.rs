//! GitHub App JWT generation.
//!
//! See <https://docs.github.com/en/apps/creating-github-apps/authenticating-with-a-github-app/generating-a-json-web-token-jwt-for-a-github-app>

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use ghauth_application::{AuthError, AuthResult, Clock, SystemClock, TokenSource};
use ghauth_domain::{AppIdentity, Credential};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Default and maximum lifetime of an application token, in seconds.
/// GitHub rejects JWTs that live longer than 10 minutes.
pub const DEFAULT_APPLICATION_TOKEN_EXPIRATION_SECONDS: i64 = 600;

/// How far `iat` is backdated to tolerate clock drift with GitHub.
const CLOCK_DRIFT_SECONDS: i64 = 60;

/// Claims carried by a GitHub App JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationClaims {
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expires at, seconds since the epoch
    pub exp: i64,
    /// App ID or Client ID
    pub iss: String,
}

/// Mints RS256-signed GitHub App JWTs.
///
/// Every call produces a fresh JWT; wrap the source in a
/// [`ReuseTokenSource`](ghauth_application::ReuseTokenSource) to reuse one
/// until it nears expiry.
pub struct ApplicationTokenSource {
    issuer: String,
    key: EncodingKey,
    expiration: Duration,
    clock: Arc<dyn Clock>,
}

impl ApplicationTokenSource {
    /// Creates a source for the app identified by `identity`, signing with a
    /// PEM-encoded RSA private key (PKCS#1 or PKCS#8).
    ///
    /// # Errors
    ///
    /// - [`AuthError::Domain`] if the identity is zero or empty
    /// - [`AuthError::KeyParse`] if the key is empty or not an RSA PEM key
    pub fn new(identity: impl Into<AppIdentity>, private_key: &[u8]) -> AuthResult<Self> {
        let issuer = identity.into().issuer()?;

        if private_key.is_empty() {
            return Err(AuthError::KeyParse("private key is empty".to_string()));
        }
        let key = EncodingKey::from_rsa_pem(private_key)
            .map_err(|e| AuthError::KeyParse(e.to_string()))?;

        Ok(Self {
            issuer,
            key,
            expiration: default_expiration(),
            clock: Arc::new(SystemClock::new()),
        })
    }

    /// Sets the JWT lifetime.
    ///
    /// Values outside `(0, 10 minutes]` fall back to 10 minutes.
    #[must_use]
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = if expiration <= Duration::zero() || expiration > default_expiration() {
            default_expiration()
        } else {
            expiration
        };
        self
    }

    /// Uses a custom clock for `iat`/`exp`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the `iss` claim value.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the effective JWT lifetime.
    #[must_use]
    pub const fn expiration(&self) -> Duration {
        self.expiration
    }
}

fn default_expiration() -> Duration {
    Duration::seconds(DEFAULT_APPLICATION_TOKEN_EXPIRATION_SECONDS)
}

#[async_trait]
impl TokenSource for ApplicationTokenSource {
    async fn token(&self) -> AuthResult<Credential> {
        let issued_at = self.clock.now() - Duration::seconds(CLOCK_DRIFT_SECONDS);
        let expires_at = issued_at + self.expiration;

        let claims = ApplicationClaims {
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
        };

        let jwt = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        tracing::debug!(issuer = %self.issuer, exp = claims.exp, "generated application token");

        Ok(Credential::bearer(jwt, Some(expires_at)))
    }
}

impl fmt::Debug for ApplicationTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationTokenSource")
            .field("issuer", &self.issuer)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

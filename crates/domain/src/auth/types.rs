//! Credential and application identity types

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Token type carried by every credential.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// A bearer credential produced by a token source.
///
/// `expiry` of `None` means the credential never expires (personal access
/// tokens). Credentials are immutable once produced; expiry is enforced by
/// whoever caches them, not by the credential itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The access token string
    pub access_token: String,
    /// Token type, always "Bearer"
    pub token_type: String,
    /// When the token expires, if it does
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    /// Creates a bearer credential.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>, expiry: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: BEARER_TOKEN_TYPE.to_string(),
            expiry,
        }
    }

    /// Check if the credential is still usable at `now`, treating it as
    /// expired `delta` before its actual expiry.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, delta: Duration) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        self.expiry.is_none_or(|expiry| {
            expiry
                .checked_sub_signed(delta)
                .is_some_and(|stale_at| stale_at > now)
        })
    }

    /// Returns the Authorization header value.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Identifies the GitHub App that signs application tokens.
///
/// GitHub accepts either the numeric App ID or the alphanumeric Client ID as
/// the JWT issuer; new apps are encouraged to use the Client ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppIdentity {
    /// Numeric App ID
    AppId(i64),
    /// Alphanumeric Client ID (e.g. `Iv1.1234567890abcdef`)
    ClientId(String),
}

impl AppIdentity {
    /// Resolves the identity into its issuer string.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidIdentity`] for a zero App ID or an empty
    /// Client ID.
    pub fn issuer(&self) -> DomainResult<String> {
        match self {
            Self::AppId(0) => Err(DomainError::InvalidIdentity),
            Self::ClientId(id) if id.is_empty() => Err(DomainError::InvalidIdentity),
            other => Ok(other.to_string()),
        }
    }
}

impl fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppId(id) => write!(f, "{id}"),
            Self::ClientId(id) => f.write_str(id),
        }
    }
}

impl From<i64> for AppIdentity {
    fn from(id: i64) -> Self {
        Self::AppId(id)
    }
}

impl From<String> for AppIdentity {
    fn from(id: String) -> Self {
        Self::ClientId(id)
    }
}

impl From<&str> for AppIdentity {
    fn from(id: &str) -> Self {
        Self::ClientId(id.to_string())
    }
}

//! Installation access token request and response types.
//!
//! These mirror the body of GitHub's
//! `POST /app/installations/{installation_id}/access_tokens` endpoint.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level granted for a single permission.
///
/// Levels GitHub adds later are kept verbatim in [`PermissionLevel::Other`],
/// so a permission set read from a response serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PermissionLevel {
    /// Read-only access
    Read,
    /// Read and write access
    Write,
    /// Administrative access
    Admin,
    /// A level this crate does not know about yet
    Other(String),
}

impl PermissionLevel {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
            Self::Other(level) => level,
        }
    }
}

impl From<String> for PermissionLevel {
    fn from(level: String) -> Self {
        match level.as_str() {
            "read" => Self::Read,
            "write" => Self::Write,
            "admin" => Self::Admin,
            _ => Self::Other(level),
        }
    }
}

impl From<PermissionLevel> for String {
    fn from(level: PermissionLevel) -> Self {
        match level {
            PermissionLevel::Other(level) => level,
            known => known.as_str().to_string(),
        }
    }
}

/// Permissions requested for, or granted to, an installation token.
///
/// Keys are GitHub permission names such as `contents`, `pull_requests` or
/// `organization_secrets`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallationPermissions(BTreeMap<String, PermissionLevel>);

impl InstallationPermissions {
    /// Creates an empty permission set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a permission, replacing any previous level for the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, level: PermissionLevel) -> Self {
        self.0.insert(name.into(), level);
        self
    }

    /// Returns the level for a permission, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PermissionLevel> {
        self.0.get(name)
    }

    /// Returns true if no permissions are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Scoping constraints for a new installation token.
///
/// Leaving every field empty requests the installation's full scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationTokenOptions {
    /// Repository names the token should have access to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<String>,
    /// Repository IDs the token should have access to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repository_ids: Vec<i64>,
    /// Permissions granted to the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<InstallationPermissions>,
}

impl InstallationTokenOptions {
    /// Restricts the token to the given repository names.
    #[must_use]
    pub fn with_repositories<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repositories = repositories.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the token to the given repository IDs.
    #[must_use]
    pub fn with_repository_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.repository_ids = ids.into_iter().collect();
        self
    }

    /// Restricts the token to the given permissions.
    #[must_use]
    pub fn with_permissions(mut self, permissions: InstallationPermissions) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

/// Repository entry returned alongside an installation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Repository name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Installation access token as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationToken {
    /// The token value
    pub token: String,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
    /// Permissions actually granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<InstallationPermissions>,
    /// Repositories the token is scoped to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<Repository>,
}

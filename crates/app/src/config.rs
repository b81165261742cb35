//! Environment configuration for `ghauth-token`.

use std::path::PathBuf;

use ghauth_domain::{AppIdentity, InstallationTokenOptions};
use thiserror::Error;

/// App ID (numeric) or Client ID.
pub const APP_ID_VAR: &str = "GITHUB_APP_ID";
/// PEM-encoded private key.
pub const PRIVATE_KEY_VAR: &str = "GITHUB_APP_PRIVATE_KEY";
/// Path to a PEM-encoded private key, used when the key itself is not set.
pub const PRIVATE_KEY_PATH_VAR: &str = "GITHUB_APP_PRIVATE_KEY_PATH";
/// Installation ID.
pub const INSTALLATION_ID_VAR: &str = "GITHUB_INSTALLATION_ID";
/// Optional GitHub Enterprise Server URL.
pub const ENTERPRISE_URL_VAR: &str = "GITHUB_ENTERPRISE_URL";
/// Optional comma-separated repository names to scope the token to.
pub const REPOSITORIES_VAR: &str = "GITHUB_REPOSITORIES";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("environment variable {name} is invalid: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The private key file could not be read.
    #[error("failed to read private key from {path}: {source}")]
    KeyFile {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Where the private key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivateKey {
    /// Key given inline.
    Inline(String),
    /// Key stored in a file.
    Path(PathBuf),
}

impl PrivateKey {
    /// Returns the PEM bytes, reading the file if needed.
    pub fn load(&self) -> Result<Vec<u8>, ConfigError> {
        match self {
            Self::Inline(pem) => Ok(pem.clone().into_bytes()),
            Self::Path(path) => std::fs::read(path).map_err(|source| ConfigError::KeyFile {
                path: path.clone(),
                source,
            }),
        }
    }
}

/// Settings needed to mint one installation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// App identity used as the JWT issuer
    pub app: AppIdentity,
    /// Signing key source
    pub private_key: PrivateKey,
    /// Installation to mint a token for
    pub installation_id: i64,
    /// GitHub Enterprise Server URL, if any
    pub enterprise_url: Option<String>,
    /// Repository names to scope the token to
    pub repositories: Vec<String>,
}

impl Config {
    /// Reads configuration through `lookup`, typically `std::env::var`.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let app = get(APP_ID_VAR).ok_or(ConfigError::Missing(APP_ID_VAR))?;
        let app = app.trim().parse::<i64>().map_or_else(
            |_| AppIdentity::ClientId(app.trim().to_string()),
            AppIdentity::AppId,
        );

        let private_key = match (get(PRIVATE_KEY_VAR), get(PRIVATE_KEY_PATH_VAR)) {
            (Some(pem), _) => PrivateKey::Inline(pem),
            (None, Some(path)) => PrivateKey::Path(PathBuf::from(path)),
            (None, None) => return Err(ConfigError::Missing(PRIVATE_KEY_VAR)),
        };

        let installation_id = get(INSTALLATION_ID_VAR)
            .ok_or(ConfigError::Missing(INSTALLATION_ID_VAR))?
            .trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::Invalid {
                name: INSTALLATION_ID_VAR,
                reason: e.to_string(),
            })?;

        let repositories = get(REPOSITORIES_VAR)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            app,
            private_key,
            installation_id,
            enterprise_url: get(ENTERPRISE_URL_VAR),
            repositories,
        })
    }

    /// Returns scoping options, or `None` to request the full installation scope.
    pub fn token_options(&self) -> Option<InstallationTokenOptions> {
        if self.repositories.is_empty() {
            return None;
        }
        Some(InstallationTokenOptions::default().with_repositories(self.repositories.clone()))
    }
}

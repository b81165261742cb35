//! GitHub App token sources.
//!
//! - [`ApplicationTokenSource`] mints app JWTs from a private key
//! - [`InstallationTokenSource`] exchanges those for installation tokens
//!
//! The `new_*` functions return sources already wrapped in a
//! [`ReuseTokenSource`], which is what most callers want.

mod application;
mod installation;

pub use application::{
    ApplicationClaims, ApplicationTokenSource, DEFAULT_APPLICATION_TOKEN_EXPIRATION_SECONDS,
};
pub use installation::{InstallationTokenSource, InstallationTokenSourceBuilder};

use ghauth_application::{AuthResult, ReuseTokenSource, StaticTokenSource, TokenSource};
use ghauth_domain::AppIdentity;

/// Creates a reusing source of application JWTs.
///
/// # Errors
///
/// See [`ApplicationTokenSource::new`].
pub fn new_application_token_source(
    identity: impl Into<AppIdentity>,
    private_key: &[u8],
) -> AuthResult<ReuseTokenSource<ApplicationTokenSource>> {
    ApplicationTokenSource::new(identity, private_key).map(ReuseTokenSource::new)
}

/// Creates a reusing source of installation tokens for installation `id`,
/// talking to `api.github.com` over a fresh connection pool.
///
/// Use [`InstallationTokenSource::builder`] for enterprise hosts, scoping
/// options or a custom transport.
///
/// # Errors
///
/// See [`InstallationTokenSourceBuilder::build`].
pub fn new_installation_token_source<S>(
    id: i64,
    app_source: S,
) -> AuthResult<ReuseTokenSource<InstallationTokenSource>>
where
    S: TokenSource + 'static,
{
    InstallationTokenSource::builder(id, app_source)
        .build()
        .map(ReuseTokenSource::new)
}

/// Creates a source for a personal access token.
#[must_use]
pub fn new_personal_access_token_source(
    token: impl Into<String>,
) -> ReuseTokenSource<StaticTokenSource> {
    ReuseTokenSource::new(StaticTokenSource::new(token))
}

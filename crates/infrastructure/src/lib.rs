//! ghauth Infrastructure - Adapters and token sources
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer:
//! - `ReqwestTransport` for HTTP
//! - `GitHubClient` for the installation token endpoint
//! - application and installation token sources

pub mod adapters;
pub mod auth;
pub mod github;

pub use adapters::{DEFAULT_USER_AGENT, ReqwestTransport};
pub use auth::{
    ApplicationClaims, ApplicationTokenSource, InstallationTokenSource,
    InstallationTokenSourceBuilder, new_application_token_source, new_installation_token_source,
    new_personal_access_token_source,
};
pub use github::{DEFAULT_BASE_URL, GITHUB_MEDIA_TYPE, GitHubClient};

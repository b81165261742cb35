//! ghauth Domain - Core authentication types
//!
//! This crate defines the domain model for GitHub App authentication.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod installation;
pub mod request;
pub mod response;

pub use auth::{AppIdentity, BEARER_TOKEN_TYPE, Credential};
pub use error::{DomainError, DomainResult};
pub use installation::{
    InstallationPermissions, InstallationToken, InstallationTokenOptions, PermissionLevel,
    Repository,
};
pub use request::{ApiRequest, HttpMethod};
pub use response::ApiResponse;

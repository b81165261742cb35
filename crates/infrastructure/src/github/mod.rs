//! GitHub REST API access.

mod client;

pub use client::{DEFAULT_BASE_URL, GITHUB_MEDIA_TYPE, GitHubClient};

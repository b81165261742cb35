//! Token source composition.
//!
//! This module provides:
//! - Expiry-aware reuse of any token source
//! - A static source for pre-issued tokens
//! - A transport decorator that attaches credentials to outbound requests

mod bearer_transport;
mod reuse;
mod static_source;

pub use bearer_transport::{AUTHORIZATION_HEADER, BearerTransport};
pub use reuse::{DEFAULT_EXPIRY_DELTA_SECONDS, ReuseTokenSource};
pub use static_source::StaticTokenSource;

//! ghauth Application - Token sources and ports
//!
//! This crate defines the token-sourcing core:
//! - Port traits (`TokenSource`, `HttpTransport`, `Clock`)
//! - Expiry-aware credential reuse
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;

pub use auth::{BearerTransport, ReuseTokenSource, StaticTokenSource};
pub use error::{AuthError, AuthResult, ErrorKind};
pub use ports::{Clock, HttpTransport, SystemClock, TokenSource};

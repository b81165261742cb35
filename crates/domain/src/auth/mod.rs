//! Credential and identity types shared by every token source.

mod types;

pub use types::{AppIdentity, BEARER_TOKEN_TYPE, Credential};

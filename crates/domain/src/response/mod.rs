//! HTTP response types

mod spec;

pub use spec::ApiResponse;

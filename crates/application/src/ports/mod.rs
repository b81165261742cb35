//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the token-sourcing core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod http_transport;
mod token_source;

pub use clock::{Clock, SystemClock};
pub use http_transport::HttpTransport;
pub use token_source::TokenSource;

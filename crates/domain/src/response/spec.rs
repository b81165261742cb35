//! Response returned by an HTTP transport

/// HTTP response as returned by a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

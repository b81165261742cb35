//! Request passed to an HTTP transport

use url::Url;

use super::HttpMethod;

/// A single HTTP request handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute request URL
    pub url: Url,
    /// Header name/value pairs, in insertion order
    pub headers: Vec<(String, String)>,
    /// Raw request body
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub const fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any existing header with the same name
    /// (compared case-insensitively).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Sets a header in place, replacing any existing header with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Returns the value of a header, if present.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_replaces_case_insensitively() {
        let request = ApiRequest::new(
            HttpMethod::Get,
            Url::parse("https://api.github.com/").unwrap(),
        )
        .header("Authorization", "Bearer old")
        .header("authorization", "Bearer new");

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header_value("AUTHORIZATION"), Some("Bearer new"));
    }
}

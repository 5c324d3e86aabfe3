//! Raw transport response

use std::time::Duration;

/// An HTTP response as received from the broker, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order; names may repeat (`set-cookie`).
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
    /// Time spent waiting for the response.
    pub duration: Duration,
}

impl RawResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            duration: Duration::ZERO,
        }
    }

    /// Creates a response with a JSON (or any textual) body and no headers.
    #[must_use]
    pub fn with_body(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, Vec::new(), body.into().into_bytes())
    }

    /// Records how long the call took.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true for 204 No Content.
    #[must_use]
    pub const fn is_no_content(&self) -> bool {
        self.status == 204
    }

    /// Returns all values of a header, matched case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as lossy UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        assert!(RawResponse::with_body(200, "{}").is_success());
        assert!(RawResponse::with_body(204, "").is_no_content());
        assert!(!RawResponse::with_body(404, "").is_success());
    }

    #[test]
    fn test_header_values_are_case_insensitive_and_repeatable() {
        let response = RawResponse::new(
            200,
            vec![
                ("Set-Cookie".to_string(), "a=1".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
                ("set-cookie".to_string(), "b=2".to_string()),
            ],
            Vec::new(),
        );
        let cookies: Vec<_> = response.header_values("set-cookie").collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }
}

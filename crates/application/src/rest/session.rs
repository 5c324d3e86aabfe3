//! Session cookie state

use parking_lot::Mutex;
use rhc_domain::{Cookie, RawResponse};

/// The `rh_sso` cookie captured from broker responses.
///
/// Once captured, the cookie is replayed on every later request made by
/// the owning client. The lock makes a client safe to share between tasks;
/// a newer cookie simply replaces the stored one.
#[derive(Debug, Default)]
pub struct SessionState {
    cookie: Mutex<Option<Cookie>>,
}

impl SessionState {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the session cookie if the response sets one.
    ///
    /// Returns true when a cookie was captured.
    pub fn capture(&self, response: &RawResponse) -> bool {
        let Some(cookie) = Cookie::find_session(response.header_values("set-cookie")) else {
            return false;
        };
        tracing::debug!(path = %cookie.path, "captured broker session cookie");
        *self.cookie.lock() = Some(cookie);
        true
    }

    /// The `Cookie` header value to send, if an unexpired session exists.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        self.cookie
            .lock()
            .as_ref()
            .filter(|cookie| !cookie.is_expired())
            .map(Cookie::to_cookie_header)
    }

    /// Forgets the session.
    pub fn clear(&self) {
        *self.cookie.lock() = None;
    }
}

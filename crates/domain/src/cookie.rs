//! Session cookie parsing.
//!
//! The broker issues an `rh_sso` cookie that the client replays on every
//! later request. Only `Set-Cookie` parsing and `Cookie` header formatting
//! are needed; there is no jar.

use chrono::{DateTime, TimeDelta, Utc};

/// Name of the broker session cookie.
pub const SESSION_COOKIE: &str = "rh_sso";

/// A single HTTP cookie as received in a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Path the cookie applies to.
    pub path: String,
    /// Expiration time (None for session cookies).
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag.
    pub secure: bool,
}

impl Cookie {
    /// Create a new cookie.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            expires: None,
            secure: false,
        }
    }

    /// Check if the cookie is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|exp| exp < Utc::now())
    }

    /// Format for Cookie header.
    #[must_use]
    pub fn to_cookie_header(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Parse from a Set-Cookie header.
    #[must_use]
    pub fn from_set_cookie(header: &str) -> Option<Self> {
        let mut parts = header.split(';');

        // First part is name=value
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Self::new(name, value.trim());

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let val = val.trim();
                match attr.trim().to_lowercase().as_str() {
                    "path" => cookie.path = val.to_string(),
                    "expires" => {
                        if let Ok(exp) = DateTime::parse_from_rfc2822(val) {
                            cookie.expires = Some(exp.with_timezone(&Utc));
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.parse::<i64>() {
                            cookie.expires = expiry_after(secs);
                        }
                    }
                    _ => {}
                }
            } else if part.eq_ignore_ascii_case("secure") {
                cookie.secure = true;
            }
        }

        Some(cookie)
    }

    /// Finds the broker session cookie among `Set-Cookie` header values.
    ///
    /// The last matching header wins.
    pub fn find_session<'a>(set_cookie_headers: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        set_cookie_headers
            .into_iter()
            .filter_map(Self::from_set_cookie)
            .filter(|c| c.name == SESSION_COOKIE && !c.value.is_empty())
            .last()
    }
}

/// Expiry for a `Max-Age` in seconds. Out-of-range values saturate: far
/// future never expires, far past is already expired.
fn expiry_after(secs: i64) -> Option<DateTime<Utc>> {
    let now = Utc::now();
    match TimeDelta::try_seconds(secs).and_then(|delta| now.checked_add_signed(delta)) {
        Some(at) => Some(at),
        None if secs < 0 => Some(DateTime::<Utc>::MIN_UTC),
        None => None,
    }
}

//! Link methods

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Method a broker link is followed with.
///
/// Brokers send the method in varying case, so decoding is
/// case-insensitive. A link without a method is followed with GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// True when parameters go in a form-encoded body rather than the
    /// query string.
    #[must_use]
    pub const fn form_encoded(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(raw: &str) -> DomainResult<Self> {
        let method = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete]
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(raw.trim()));
        method.ok_or_else(|| DomainError::UnsupportedMethod(raw.to_string()))
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = DomainError;

    fn try_from(raw: String) -> DomainResult<Self> {
        raw.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!(" Delete ".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!(
            "HEAD".parse::<HttpMethod>().unwrap_err(),
            DomainError::UnsupportedMethod("HEAD".to_string())
        );
    }

    #[test]
    fn test_link_method_json() {
        let method: HttpMethod = serde_json::from_str(r#""post""#).unwrap();
        assert_eq!(method, HttpMethod::Post);
        assert_eq!(serde_json::to_string(&HttpMethod::Put).unwrap(), r#""PUT""#);
        assert!(serde_json::from_str::<HttpMethod>(r#""TRACE""#).is_err());
    }

    #[test]
    fn test_parameter_placement() {
        assert!(!HttpMethod::Get.form_encoded());
        assert!(!HttpMethod::Delete.form_encoded());
        assert!(HttpMethod::Post.form_encoded());
        assert!(HttpMethod::Put.form_encoded());
    }
}

//! Response envelope and server messages
//!
//! Every broker body has the shape `{type, data, messages}`. The `type`
//! discriminant selects how `data` is hydrated (see [`crate::resource::Payload`]).

use serde::{Deserialize, Deserializer, Serialize};

/// Severity of a server message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// An error; the only severity the error mapper selects on.
    Error,
    /// A warning shown to the user.
    Warning,
    /// Informational text.
    Info,
    /// Output of a server-side operation.
    Result,
    /// Debug output.
    Debug,
    /// Any other severity string.
    Other(String),
}

impl Severity {
    /// Parses a severity string case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "ERROR" => Self::Error,
            "WARNING" => Self::Warning,
            "INFO" => Self::Info,
            "RESULT" => Self::Result,
            "DEBUG" => Self::Debug,
            _ => Self::Other(raw.to_string()),
        }
    }
}

/// A message attached to a broker response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Raw severity string as sent by the server.
    #[serde(default)]
    pub severity: Option<String>,
    /// Human-readable text.
    #[serde(default)]
    pub text: Option<String>,
    /// Field the message refers to (validation errors).
    #[serde(default)]
    pub field: Option<String>,
    /// Error code the client should exit with.
    #[serde(default, alias = "code")]
    pub exit_code: Option<i32>,
}

impl Message {
    /// Creates a message with the given severity and text.
    #[must_use]
    pub fn new(severity: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            severity: Some(severity.into()),
            text: Some(text.into()),
            field: None,
            exit_code: None,
        }
    }

    /// Sets the field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Parsed severity, if the server sent one.
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.severity.as_deref().map(Severity::parse)
    }

    /// True when the severity upcases to exactly `ERROR`.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.severity(), Some(Severity::Error))
    }

    /// Text, or the empty string.
    #[must_use]
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The decoded body of a broker response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Envelope {
    /// Discriminant selecting how `data` is hydrated.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// The payload.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Messages accompanying the payload.
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
    /// API version the broker answered with.
    #[serde(default)]
    pub api_version: Option<serde_json::Value>,
    /// API versions the broker supports.
    #[serde(default, deserialize_with = "null_as_default")]
    pub supported_api_versions: Vec<serde_json::Value>,
}

impl Envelope {
    /// Decodes an envelope from a response body.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the body is not a JSON object of the
    /// expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

//! Environment variable resource

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A user-defined environment variable on an application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    /// Variable name.
    #[serde(default)]
    pub name: String,
    /// Variable value; absent when the broker hides values.
    #[serde(default)]
    pub value: Option<String>,
}

impl EnvironmentVariable {
    /// Parses a `NAME=VALUE` assignment.
    ///
    /// # Errors
    ///
    /// Returns an error when there is no `=` or the name is not a valid
    /// shell identifier.
    pub fn parse_assignment(raw: &str) -> DomainResult<Self> {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidEnvironmentVariable(raw.to_string()))?;
        if !Self::is_valid_name(name) {
            return Err(DomainError::InvalidEnvironmentVariable(raw.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        })
    }

    /// True for names made of letters, digits and underscores, not
    /// starting with a digit.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

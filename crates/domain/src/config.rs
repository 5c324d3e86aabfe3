//! Local configuration document
//!
//! The configuration file is INI-like: `key = value` lines, `#` comments
//! and blank lines. [`ConfigDocument`] keeps every line so that a rewrite
//! only touches the keys that changed.

use std::fmt;
use std::time::Duration;

use crate::error::{DomainError, DomainResult};

/// Default broker host.
pub const DEFAULT_SERVER: &str = "openshift.redhat.com";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Entry { key: String, value: String },
    Other(String),
}

/// A parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    lines: Vec<Line>,
}

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Parses file content.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-comment line without `=`.
    pub fn parse(content: &str) -> DomainResult<Self> {
        let mut lines = Vec::new();
        for (index, raw) in content.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                lines.push(Line::Other(raw.to_string()));
                continue;
            }
            let (key, value) = trimmed
                .split_once('=')
                .ok_or_else(|| DomainError::InvalidConfigLine {
                    line: index + 1,
                    content: raw.to_string(),
                })?;
            lines.push(Line::Entry {
                key: key.trim().to_string(),
                value: unquote(value.trim()).to_string(),
            });
        }
        Ok(Self { lines })
    }

    /// Returns the last value set for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            Line::Entry { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Sets a key, updating it in place or appending it.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let existing = self.lines.iter_mut().rev().find_map(|line| match line {
            Line::Entry { key: k, value } if k == key => Some(value),
            _ => None,
        });
        match existing {
            Some(slot) => *slot = value,
            None => self.lines.push(Line::Entry {
                key: key.to_string(),
                value,
            }),
        }
    }

    /// Removes every entry for a key. Returns true if any was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.lines.len();
        self.lines
            .retain(|line| !matches!(line, Line::Entry { key: k, .. } if k == key));
        before != self.lines.len()
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry { key, .. } => Some(key.as_str()),
            Line::Other(_) => None,
        })
    }

    /// Reads the settings this client understands.
    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            login: self.get("default_rhlogin").map(str::to_string),
            server: self.get("libra_server").map(str::to_string),
            insecure: self.get("insecure").is_some_and(parse_bool),
            timeout: self
                .get("timeout")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Entry { key, value } => writeln!(f, "{key}={}", quote(value))?,
                Line::Other(raw) => writeln!(f, "{raw}")?,
            }
        }
        Ok(())
    }
}

/// Session defaults read from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSettings {
    /// `default_rhlogin`.
    pub login: Option<String>,
    /// `libra_server`.
    pub server: Option<String>,
    /// `insecure`.
    pub insecure: bool,
    /// `timeout`, in seconds in the file.
    pub timeout: Option<Duration>,
}

impl SessionSettings {
    /// The configured server or the default one.
    #[must_use]
    pub fn server_or_default(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1")
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

fn quote(value: &str) -> String {
    if value.contains(char::is_whitespace) || value.contains('#') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "# OpenShift config\n\ndefault_rhlogin = 'alice@example.com'\nlibra_server=broker.example.com\ninsecure = true\ntimeout = 60\ncustom_key = kept\n";

    #[test]
    fn test_parse_and_read_settings() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        let settings = doc.settings();
        assert_eq!(settings.login.as_deref(), Some("alice@example.com"));
        assert_eq!(settings.server_or_default(), "broker.example.com");
        assert!(settings.insecure);
        assert_eq!(settings.timeout, Some(Duration::from_secs(60)));
        assert_eq!(doc.get("custom_key"), Some("kept"));
    }

    #[test]
    fn test_set_preserves_comments_and_unknown_keys() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        doc.set("libra_server", "other.example.com");
        doc.set("new_key", "with space");
        let rendered = doc.to_string();

        assert!(rendered.starts_with("# OpenShift config\n\n"));
        assert!(rendered.contains("libra_server=other.example.com\n"));
        assert!(rendered.contains("custom_key=kept\n"));
        assert!(rendered.ends_with("new_key=\"with space\"\n"));

        let reparsed = ConfigDocument::parse(&rendered).unwrap();
        assert_eq!(reparsed.get("new_key"), Some("with space"));
    }

    #[test]
    fn test_remove() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert!(doc.remove("insecure"));
        assert!(!doc.remove("insecure"));
        assert!(!doc.settings().insecure);
    }

    #[test]
    fn test_invalid_line() {
        let err = ConfigDocument::parse("ok=1\nbroken line\n").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidConfigLine {
                line: 2,
                content: "broken line".to_string()
            }
        );
    }

    #[test]
    fn test_defaults() {
        let settings = ConfigDocument::new().settings();
        assert_eq!(settings.server_or_default(), DEFAULT_SERVER);
        assert!(settings.login.is_none());
        assert!(!settings.insecure);
    }
}

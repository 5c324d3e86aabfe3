//! SSH key resource

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use super::Links;

/// A public SSH key registered with the broker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Key {
    /// Key name.
    #[serde(default)]
    pub name: String,
    /// Key type (e.g. `ssh-rsa`).
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Base64 key material.
    #[serde(default)]
    pub content: String,
    /// Operations on this key.
    #[serde(default)]
    pub links: Links,
    /// MD5 fingerprint, computed locally after parsing.
    #[serde(skip)]
    pub fingerprint: Option<String>,
}

impl Key {
    /// Computes and stores the fingerprint.
    pub fn attach_fingerprint(&mut self) {
        self.fingerprint = fingerprint(&self.content);
    }

    /// Splits an OpenSSH public key line (`type content [comment]`).
    #[must_use]
    pub fn parse_public_key(line: &str) -> Option<(String, String)> {
        let mut parts = line.split_whitespace();
        let kind = parts.next()?;
        let content = parts.next()?;
        fingerprint(content)?;
        Some((kind.to_string(), content.to_string()))
    }
}

/// Colon-separated MD5 fingerprint of base64 key material.
///
/// Returns `None` when the content is not valid base64.
#[must_use]
pub fn fingerprint(content: &str) -> Option<String> {
    let decoded = STANDARD.decode(content.trim()).ok()?;
    let digest = Md5::digest(&decoded);
    Some(
        digest
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":"),
    )
}

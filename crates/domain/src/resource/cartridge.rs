//! Cartridge resource

use serde::{Deserialize, Serialize};

use super::Links;

/// A cartridge, either available from the broker or embedded in an application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cartridge {
    /// Cartridge name (e.g. `php-5.3`).
    #[serde(default)]
    pub name: String,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// `standalone` (web) or `embedded`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Minimum gear count.
    #[serde(default)]
    pub scales_from: Option<i64>,
    /// Maximum gear count (-1 for unlimited).
    #[serde(default)]
    pub scales_to: Option<i64>,
    /// Current gear count.
    #[serde(default)]
    pub current_scale: Option<i64>,
    /// Gear size.
    #[serde(default)]
    pub gear_profile: Option<String>,
    /// Tags such as `web_framework`.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Status messages returned by a status query.
    #[serde(default)]
    pub status_messages: Vec<serde_json::Value>,
    /// Operations on this cartridge.
    #[serde(default)]
    pub links: Links,
}

impl Cartridge {
    /// True for web (standalone) cartridges.
    #[must_use]
    pub fn is_web(&self) -> bool {
        self.kind.as_deref() == Some("standalone")
            || self.tags.iter().any(|t| t == "web_framework")
    }

    /// Human-readable scaling range.
    #[must_use]
    pub fn scale_description(&self) -> Option<String> {
        let from = self.scales_from?;
        let to = self.scales_to?;
        let upper = if to < 0 {
            "available".to_string()
        } else {
            to.to_string()
        };
        Some(format!("{from} - {upper}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_description() {
        let cart = Cartridge {
            scales_from: Some(1),
            scales_to: Some(-1),
            ..Cartridge::default()
        };
        assert_eq!(cart.scale_description().as_deref(), Some("1 - available"));

        let cart = Cartridge {
            scales_from: Some(2),
            scales_to: Some(4),
            ..Cartridge::default()
        };
        assert_eq!(cart.scale_description().as_deref(), Some("2 - 4"));
        assert!(Cartridge::default().scale_description().is_none());
    }
}

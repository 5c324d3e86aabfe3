//! Application resource

use serde::{Deserialize, Serialize};

use super::Links;

/// An application hosted in a domain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Application {
    /// Application UUID.
    #[serde(default)]
    pub id: Option<String>,
    /// Application name.
    #[serde(default)]
    pub name: String,
    /// Owning namespace.
    #[serde(default)]
    pub domain_id: String,
    /// Primary web cartridge.
    #[serde(default)]
    pub framework: Option<String>,
    /// Creation timestamp as sent by the broker.
    #[serde(default)]
    pub creation_time: Option<String>,
    /// Public URL.
    #[serde(default)]
    pub app_url: Option<String>,
    /// Git repository URL.
    #[serde(default)]
    pub git_url: Option<String>,
    /// SSH URL of the primary gear (`ssh://uuid@host`).
    #[serde(default)]
    pub ssh_url: Option<String>,
    /// Gear size.
    #[serde(default)]
    pub gear_profile: Option<String>,
    /// Whether the application scales horizontally.
    #[serde(default)]
    pub scalable: bool,
    /// Repository the application was created from.
    #[serde(default)]
    pub initial_git_url: Option<String>,
    /// Custom DNS aliases.
    #[serde(default)]
    pub aliases: Vec<serde_json::Value>,
    /// Operations on this application.
    #[serde(default)]
    pub links: Links,
    /// Informational messages the broker returned with this application.
    #[serde(skip)]
    pub messages: Vec<String>,
}

impl Application {
    /// `name-namespace` style label used in output.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}-{}", self.name, self.domain_id)
    }
}

//! Domain (namespace) resource

use serde::{Deserialize, Serialize};

use super::Links;

/// A namespace that owns applications.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Domain {
    /// Namespace identifier.
    #[serde(default)]
    pub id: String,
    /// Namespace name as reported by newer brokers.
    #[serde(default)]
    pub name: Option<String>,
    /// Suffix appended to application hostnames.
    #[serde(default)]
    pub suffix: Option<String>,
    /// Owning login.
    #[serde(default)]
    pub creator: Option<String>,
    /// Operations on this domain.
    #[serde(default)]
    pub links: Links,
}

impl Domain {
    /// The namespace as the user types it.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(self.id.as_str())
    }
}

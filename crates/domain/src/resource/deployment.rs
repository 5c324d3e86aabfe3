//! Deployment resource

use serde::{Deserialize, Serialize};

/// A deployment of an application's repository.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Deployment {
    /// Deployment identifier.
    #[serde(default)]
    pub id: String,
    /// Git ref that was deployed.
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    /// Commit that was deployed.
    #[serde(default)]
    pub sha1: Option<String>,
    /// Creation time as sent by the broker.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Activation times.
    #[serde(default)]
    pub activations: Vec<serde_json::Value>,
    /// Whether the build was forced clean.
    #[serde(default)]
    pub force_clean_build: bool,
    /// Whether the deployment was hot.
    #[serde(default)]
    pub hot_deploy: bool,
}

impl Deployment {
    /// True once the deployment has been activated at least once.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        !self.activations.is_empty()
    }
}

//! User resource

use serde::{Deserialize, Serialize};

use super::Links;

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    /// Login name.
    #[serde(default)]
    pub login: String,
    /// Subscription plan.
    #[serde(default)]
    pub plan_id: Option<String>,
    /// Gears in use.
    #[serde(default)]
    pub consumed_gears: u32,
    /// Gear quota.
    #[serde(default)]
    pub max_gears: u32,
    /// Operations on this user.
    #[serde(default)]
    pub links: Links,
}

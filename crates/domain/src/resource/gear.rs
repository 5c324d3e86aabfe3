//! Gear groups and SSH-reachable gear targets

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// A cartridge reference inside a gear group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GearGroupCartridge {
    /// Cartridge name.
    #[serde(default)]
    pub name: String,
}

/// A single gear.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Gear {
    /// Gear UUID.
    #[serde(default)]
    pub id: String,
    /// Gear state (`started`, `stopped`, ...).
    #[serde(default)]
    pub state: Option<String>,
    /// SSH URL (`ssh://uuid@host`).
    #[serde(default)]
    pub ssh_url: Option<String>,
}

/// Gears sharing the same set of cartridges.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GearGroup {
    /// Group identifier.
    #[serde(default)]
    pub id: String,
    /// Group name.
    #[serde(default)]
    pub name: Option<String>,
    /// Gear size.
    #[serde(default)]
    pub gear_profile: Option<String>,
    /// Cartridges hosted by every gear in the group.
    #[serde(default)]
    pub cartridges: Vec<GearGroupCartridge>,
    /// Member gears.
    #[serde(default)]
    pub gears: Vec<Gear>,
}

impl GearGroup {
    /// Space-joined cartridge names.
    #[must_use]
    pub fn cartridge_names(&self) -> String {
        self.cartridges
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One gear's SSH endpoint, derived from its `ssh_url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GearTarget {
    /// Gear UUID.
    pub gear_id: String,
    /// SSH login.
    pub user: String,
    /// SSH host.
    pub host: String,
    /// Label shown in output: gear id followed by the group's cartridges.
    pub label: String,
}

impl GearTarget {
    /// Builds the target for a gear of a group.
    ///
    /// # Errors
    ///
    /// Returns an error when the gear has no usable `ssh_url`.
    pub fn for_gear(group: &GearGroup, gear: &Gear) -> DomainResult<Self> {
        let ssh_url = gear
            .ssh_url
            .as_deref()
            .ok_or_else(|| DomainError::InvalidSshUrl(format!("gear {} has no ssh_url", gear.id)))?;
        let (user, host) = parse_ssh_url(ssh_url)?;
        let cartridges = group.cartridge_names();
        let label = if cartridges.is_empty() {
            gear.id.clone()
        } else {
            format!("{} {cartridges}", gear.id)
        };
        Ok(Self {
            gear_id: gear.id.clone(),
            user,
            host,
            label,
        })
    }

    /// `user@host` destination for the ssh command line.
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// Splits `ssh://user@host[:port]` (or bare `user@host`) into login and host.
///
/// # Errors
///
/// Returns an error when no user or host can be found.
pub fn parse_ssh_url(raw: &str) -> DomainResult<(String, String)> {
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("ssh://{raw}")
    };
    let url = Url::parse(&with_scheme).map_err(|e| DomainError::InvalidSshUrl(format!("{raw}: {e}")))?;
    let user = url.username();
    let host = url.host_str().unwrap_or_default();
    if user.is_empty() || host.is_empty() {
        return Err(DomainError::InvalidSshUrl(raw.to_string()));
    }
    Ok((user.to_string(), host.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn group() -> GearGroup {
        GearGroup {
            id: "g1".to_string(),
            cartridges: vec![
                GearGroupCartridge {
                    name: "php-5.3".to_string(),
                },
                GearGroupCartridge {
                    name: "mysql-5.1".to_string(),
                },
            ],
            ..GearGroup::default()
        }
    }

    #[test]
    fn test_target_from_ssh_url() {
        let gear = Gear {
            id: "abc".to_string(),
            ssh_url: Some("ssh://abc@app-ns.example.com".to_string()),
            ..Gear::default()
        };
        let target = GearTarget::for_gear(&group(), &gear).unwrap();
        assert_eq!(target.user, "abc");
        assert_eq!(target.host, "app-ns.example.com");
        assert_eq!(target.label, "abc php-5.3 mysql-5.1");
        assert_eq!(target.destination(), "abc@app-ns.example.com");
    }

    #[test]
    fn test_parse_bare_destination() {
        let (user, host) = parse_ssh_url("uuid@host.example.com").unwrap();
        assert_eq!(user, "uuid");
        assert_eq!(host, "host.example.com");
    }

    #[test]
    fn test_missing_ssh_url() {
        let gear = Gear {
            id: "abc".to_string(),
            ..Gear::default()
        };
        assert!(GearTarget::for_gear(&group(), &gear).is_err());
        assert!(parse_ssh_url("ssh://host-only").is_err());
    }

    #[test]
    fn test_label_without_cartridges() {
        let gear = Gear {
            id: "abc".to_string(),
            ssh_url: Some("ssh://abc@h".to_string()),
            ..Gear::default()
        };
        let target = GearTarget::for_gear(&GearGroup::default(), &gear).unwrap();
        assert_eq!(target.label, "abc");
    }
}

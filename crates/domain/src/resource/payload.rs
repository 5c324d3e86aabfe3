//! Tagged payload dispatch
//!
//! The envelope's `type` string is a closed set of known tags; each maps
//! to one constructor. Unknown tags fall through to [`Payload::Raw`].

use crate::response::{Envelope, Message, Severity};

use super::{
    Application, Cartridge, Deployment, Domain, EnvironmentVariable, GearGroup, Key, Links, User,
};

/// A hydrated response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// API root link table.
    Links(Links),
    /// List of domains.
    Domains(Vec<Domain>),
    /// One domain.
    Domain(Domain),
    /// List of applications.
    Applications(Vec<Application>),
    /// One application.
    Application(Box<Application>),
    /// List of cartridges.
    Cartridges(Vec<Cartridge>),
    /// One cartridge.
    Cartridge(Box<Cartridge>),
    /// The authenticated user.
    User(User),
    /// List of SSH keys.
    Keys(Vec<Key>),
    /// One SSH key.
    Key(Key),
    /// Gear groups of an application.
    GearGroups(Vec<GearGroup>),
    /// List of environment variables.
    EnvironmentVariables(Vec<EnvironmentVariable>),
    /// One environment variable.
    EnvironmentVariable(EnvironmentVariable),
    /// List of deployments.
    Deployments(Vec<Deployment>),
    /// One deployment.
    Deployment(Deployment),
    /// Data of an unrecognised type, returned verbatim.
    Raw(serde_json::Value),
}

impl Payload {
    /// Hydrates the envelope's data according to its type tag.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when `data` does not fit the tagged type.
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, serde_json::Error> {
        let data = envelope.data.clone();
        let Some(kind) = envelope.kind.as_deref() else {
            return Ok(Self::Raw(data));
        };

        let payload = match kind {
            "links" => Self::Links(serde_json::from_value(data)?),
            "domains" => Self::Domains(serde_json::from_value(data)?),
            "domain" => Self::Domain(serde_json::from_value(data)?),
            "applications" => Self::Applications(serde_json::from_value(data)?),
            "application" => {
                let mut application: Application = serde_json::from_value(data)?;
                application.messages = display_messages(&envelope.messages);
                Self::Application(Box::new(application))
            }
            "cartridges" => Self::Cartridges(serde_json::from_value(data)?),
            "cartridge" => Self::Cartridge(Box::new(serde_json::from_value(data)?)),
            "user" => Self::User(serde_json::from_value(data)?),
            "keys" => {
                let mut keys: Vec<Key> = serde_json::from_value(data)?;
                keys.iter_mut().for_each(Key::attach_fingerprint);
                Self::Keys(keys)
            }
            "key" => {
                let mut key: Key = serde_json::from_value(data)?;
                key.attach_fingerprint();
                Self::Key(key)
            }
            "gear_groups" => Self::GearGroups(serde_json::from_value(data)?),
            "environment-variables" => Self::EnvironmentVariables(serde_json::from_value(data)?),
            "environment-variable" => Self::EnvironmentVariable(serde_json::from_value(data)?),
            "deployments" => Self::Deployments(serde_json::from_value(data)?),
            "deployment" => Self::Deployment(serde_json::from_value(data)?),
            _ => Self::Raw(data),
        };
        Ok(payload)
    }

    /// Name of the variant, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Links(_) => "links",
            Self::Domains(_) => "domains",
            Self::Domain(_) => "domain",
            Self::Applications(_) => "applications",
            Self::Application(_) => "application",
            Self::Cartridges(_) => "cartridges",
            Self::Cartridge(_) => "cartridge",
            Self::User(_) => "user",
            Self::Keys(_) => "keys",
            Self::Key(_) => "key",
            Self::GearGroups(_) => "gear_groups",
            Self::EnvironmentVariables(_) => "environment-variables",
            Self::EnvironmentVariable(_) => "environment-variable",
            Self::Deployments(_) => "deployments",
            Self::Deployment(_) => "deployment",
            Self::Raw(_) => "raw",
        }
    }
}

/// Field-less info/result texts shown to the user after an operation.
fn display_messages(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m.field.is_none())
        .filter(|m| matches!(m.severity(), Some(Severity::Info | Severity::Result)))
        .filter_map(|m| m.text.clone())
        .collect()
}

/// Extracts a concrete resource type from a [`Payload`].
pub trait FromPayload: Sized {
    /// Returns the value, or gives the payload back when it is of another type.
    ///
    /// # Errors
    ///
    /// Returns the original payload on a type mismatch.
    fn from_payload(payload: Payload) -> Result<Self, Payload>;
}

impl FromPayload for Payload {
    fn from_payload(payload: Payload) -> Result<Self, Payload> {
        Ok(payload)
    }
}

macro_rules! from_payload {
    ($ty:ty, boxed $variant:ident) => {
        impl FromPayload for $ty {
            fn from_payload(payload: Payload) -> Result<Self, Payload> {
                match payload {
                    Payload::$variant(value) => Ok(*value),
                    other => Err(other),
                }
            }
        }
    };
    ($ty:ty, $variant:ident) => {
        impl FromPayload for $ty {
            fn from_payload(payload: Payload) -> Result<Self, Payload> {
                match payload {
                    Payload::$variant(value) => Ok(value),
                    other => Err(other),
                }
            }
        }
    };
}

from_payload!(Links, Links);
from_payload!(Vec<Domain>, Domains);
from_payload!(Domain, Domain);
from_payload!(Vec<Application>, Applications);
from_payload!(Application, boxed Application);
from_payload!(Vec<Cartridge>, Cartridges);
from_payload!(Cartridge, boxed Cartridge);
from_payload!(User, User);
from_payload!(Vec<Key>, Keys);
from_payload!(Key, Key);
from_payload!(Vec<GearGroup>, GearGroups);
from_payload!(Vec<EnvironmentVariable>, EnvironmentVariables);
from_payload!(EnvironmentVariable, EnvironmentVariable);
from_payload!(Vec<Deployment>, Deployments);
from_payload!(Deployment, Deployment);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn envelope(json: &str) -> Envelope {
        Envelope::from_slice(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_domain_payload() {
        let payload = Payload::from_envelope(&envelope(
            r#"{"type":"domain","data":{"id":"myns"},"messages":[]}"#,
        ))
        .unwrap();
        let domain = Domain::from_payload(payload).unwrap();
        assert_eq!(domain.id, "myns");
        assert_eq!(domain.namespace(), "myns");
    }

    #[test]
    fn test_list_payload() {
        let payload = Payload::from_envelope(&envelope(
            r#"{"type":"applications","data":[{"name":"a","domain_id":"ns"},{"name":"b","domain_id":"ns"}]}"#,
        ))
        .unwrap();
        let apps = Vec::<Application>::from_payload(payload).unwrap();
        let names: Vec<_> = apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_application_collects_display_messages() {
        let payload = Payload::from_envelope(&envelope(
            r#"{"type":"application","data":{"name":"a","domain_id":"ns"},"messages":[
                {"severity":"info","text":"Application a was created."},
                {"severity":"result","text":"MySQL root password: x"},
                {"severity":"info","field":"name","text":"ignored"},
                {"severity":"debug","text":"ignored too"}]}"#,
        ))
        .unwrap();
        let app = Application::from_payload(payload).unwrap();
        assert_eq!(
            app.messages,
            vec![
                "Application a was created.".to_string(),
                "MySQL root password: x".to_string()
            ]
        );
    }

    #[test]
    fn test_keys_get_fingerprints() {
        let payload = Payload::from_envelope(&envelope(
            r#"{"type":"keys","data":[{"name":"default","type":"ssh-rsa","content":"YWJj"}]}"#,
        ))
        .unwrap();
        let keys = Vec::<Key>::from_payload(payload).unwrap();
        assert_eq!(
            keys[0].fingerprint.as_deref(),
            Some("90:01:50:98:3c:d2:4f:b0:d6:96:3f:7d:28:e1:7f:72")
        );
    }

    #[test]
    fn test_unknown_type_returns_raw_data() {
        let payload = Payload::from_envelope(&envelope(
            r#"{"type":"quota","data":{"gears":3},"messages":[]}"#,
        ))
        .unwrap();
        assert_eq!(payload, Payload::Raw(serde_json::json!({"gears": 3})));
    }

    #[test]
    fn test_missing_type_returns_raw_data() {
        let payload = Payload::from_envelope(&envelope(r#"{"data":[1,2]}"#)).unwrap();
        assert_eq!(payload, Payload::Raw(serde_json::json!([1, 2])));
    }

    #[test]
    fn test_mismatched_data_is_an_error() {
        let result = Payload::from_envelope(&envelope(r#"{"type":"domains","data":{"id":"x"}}"#));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_payload_mismatch_gives_payload_back() {
        let payload = Payload::Raw(serde_json::Value::Null);
        let back = Domain::from_payload(payload).unwrap_err();
        assert_eq!(back.type_name(), "raw");
    }
}

//! Resource links

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;

/// A parameter declared by a link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkParam {
    /// Parameter name.
    #[serde(default)]
    pub name: String,
    /// Declared type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A named operation on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL of the operation.
    pub href: String,
    /// HTTP method to use.
    #[serde(default)]
    pub method: HttpMethod,
    /// Link relation description.
    #[serde(default)]
    pub rel: Option<String>,
    /// Required parameters.
    #[serde(default)]
    pub required_params: Vec<LinkParam>,
    /// Optional parameters.
    #[serde(default)]
    pub optional_params: Vec<LinkParam>,
}

impl Link {
    /// Creates a link.
    #[must_use]
    pub fn new(method: HttpMethod, href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method,
            rel: None,
            required_params: Vec::new(),
            optional_params: Vec::new(),
        }
    }

    /// True when the link declares a parameter with the given name.
    #[must_use]
    pub fn accepts(&self, param: &str) -> bool {
        self.required_params
            .iter()
            .chain(&self.optional_params)
            .any(|p| p.name == param)
    }
}

/// Links keyed by relation name (e.g. `LIST_APPLICATIONS`).
pub type Links = HashMap<String, Link>;

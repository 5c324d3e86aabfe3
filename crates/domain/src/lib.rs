//! rhc Domain - Core broker types
//!
//! This crate defines the domain model for the rhc broker client:
//! broker resources, the response envelope, the broker error taxonomy,
//! and the local configuration document.
//! All types here are pure Rust with no I/O dependencies.

pub mod broker_error;
pub mod config;
pub mod cookie;
pub mod error;
pub mod request;
pub mod resource;
pub mod response;

pub use broker_error::{BrokerError, ErrorKind};
pub use config::{ConfigDocument, SessionSettings};
pub use cookie::{Cookie, SESSION_COOKIE};
pub use error::{DomainError, DomainResult};
pub use request::{BrokerRequest, Credentials, HttpMethod};
pub use resource::{
    Application, Cartridge, Deployment, Domain, EnvironmentVariable, FromPayload, Gear,
    GearGroup, GearGroupCartridge, GearTarget, Key, Link, LinkParam, Links, Payload, User,
    fingerprint, parse_ssh_url,
};
pub use response::{Envelope, Message, RawResponse, Severity};

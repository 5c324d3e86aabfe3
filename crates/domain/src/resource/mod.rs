//! Broker resources
//!
//! Plain records hydrated field-by-field from a response's `data`. Each
//! resource that supports operations carries its [`Links`].

mod application;
mod cartridge;
mod deployment;
mod domain;
mod environment;
mod gear;
mod key;
mod link;
mod payload;
mod user;

pub use application::Application;
pub use cartridge::Cartridge;
pub use deployment::Deployment;
pub use domain::Domain;
pub use environment::EnvironmentVariable;
pub use gear::{Gear, GearGroup, GearGroupCartridge, GearTarget, parse_ssh_url};
pub use key::{Key, fingerprint};
pub use link::{Link, LinkParam, Links};
pub use payload::{FromPayload, Payload};
pub use user::User;

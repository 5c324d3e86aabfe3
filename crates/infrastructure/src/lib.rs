//! rhc Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, the external tool runner,
//! and the configuration file repository.

pub mod adapters;
pub mod persistence;

pub use adapters::{
    DEFAULT_TIMEOUT, ProcessError, ProcessRunner, ReqwestTransport, SshProcessShell,
    TransportOptions,
};
pub use persistence::{ConfigError, ConfigRepository};

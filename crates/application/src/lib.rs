//! rhc Application - Broker client and gear execution
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the HTTP transport and remote shells)
//! - The broker REST client: response parsing, error mapping, retries
//! - The multi-gear executor

pub mod multi_gear;
pub mod ports;
pub mod rest;

pub use multi_gear::{
    GearFailure, GearOutcome, MultiGearExecutor, MultiGearOptions, MultiGearReport, OutputMode,
};
pub use ports::{OutputStream, RemoteShell, RemoteShellError, ShellLine, Transport, TransportError};
pub use rest::{
    ApiRoot, ApplicationEvent, BrokerClient, CartridgeEvent, ClientConfig, NewApplication,
    ParsedResponse, RetryPolicy, SessionState,
};

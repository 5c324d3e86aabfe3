//! Broker REST client
//!
//! A call flows through four stages: the [`Transport`](crate::ports::Transport)
//! sends it (wrapped by [`RetryPolicy`]), [`SessionState`] captures the
//! session cookie, and [`parser::interpret`] turns the response into a
//! [`ParsedResponse`] or a typed [`BrokerError`](rhc_domain::BrokerError)
//! built by [`error_mapper`].

mod client;
pub mod error_mapper;
pub mod parser;
mod retry;
mod session;

pub use client::{
    ApiRoot, ApplicationEvent, BrokerClient, CartridgeEvent, ClientConfig, NewApplication,
};
pub use parser::ParsedResponse;
pub use retry::{RetryPolicy, transport_failure};
pub use session::SessionState;

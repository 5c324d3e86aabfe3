//! Broker response types
//!
//! [`RawResponse`] is what a transport hands back; [`Envelope`] is the
//! decoded `{type, data, messages}` body.

mod envelope;
mod raw;

pub use envelope::{Envelope, Message, Severity};
pub use raw::RawResponse;

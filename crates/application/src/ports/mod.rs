//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod remote_shell;
mod transport;

pub use remote_shell::{OutputStream, RemoteShell, RemoteShellError, ShellLine};
pub use transport::{Transport, TransportError};

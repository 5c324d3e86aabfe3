//! Adapters implementing the application ports and wrapping external tools.

mod process;
mod reqwest_client;
mod ssh_shell;

pub use process::{ProcessError, ProcessRunner};
pub use reqwest_client::{DEFAULT_TIMEOUT, ReqwestTransport, TransportOptions};
pub use ssh_shell::SshProcessShell;

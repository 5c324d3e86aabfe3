//! Remote shell port

use async_trait::async_trait;
use rhc_domain::GearTarget;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Which stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// One line of remote output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLine {
    /// Source stream.
    pub stream: OutputStream,
    /// Line text without the trailing newline.
    pub text: String,
}

impl ShellLine {
    /// A stdout line.
    #[must_use]
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            stream: OutputStream::Stdout,
            text: text.into(),
        }
    }

    /// A stderr line.
    #[must_use]
    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            stream: OutputStream::Stderr,
            text: text.into(),
        }
    }
}

/// Errors opening or running a remote session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteShellError {
    /// The gear could not be reached or refused the login.
    #[error("unable to connect to {destination}: {message}")]
    Connect {
        /// `user@host`.
        destination: String,
        /// What went wrong.
        message: String,
    },

    /// The local ssh client could not be started.
    #[error("failed to start ssh: {0}")]
    Spawn(String),

    /// Reading the session output failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for running one command on one gear.
#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Runs `command` on `target`, sending each output line as it arrives.
    ///
    /// Returns the remote exit status once the session ends.
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot be established.
    async fn execute(
        &self,
        target: &GearTarget,
        command: &str,
        output: UnboundedSender<ShellLine>,
    ) -> Result<i32, RemoteShellError>;
}

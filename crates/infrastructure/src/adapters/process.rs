//! External tool invocation (git, ssh, scp, rsync)
//!
//! A zero exit status means success. Otherwise the captured stderr is
//! relayed in the error.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program is not installed.
    #[error("{program} was not found; make sure it is installed and on your PATH")]
    NotFound {
        /// Program name.
        program: String,
    },

    /// The program could not be started or its I/O failed.
    #[error("failed to run {program}: {source}")]
    Io {
        /// Program name.
        program: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The program exited unsuccessfully.
    #[error("{program} exited with status {code}{}", stderr_suffix(.stderr))]
    Failed {
        /// Program name.
        program: String,
        /// Exit status, or -1 when killed by a signal.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl ProcessError {
    /// Exit status to propagate to the shell.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Failed { code, .. } if *code > 0 => *code,
            _ => 1,
        }
    }
}

/// Runs external tools.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Creates a runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn command<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Command {
        tracing::debug!(
            program,
            args = ?args.iter().map(|a| a.as_ref().to_string_lossy()).collect::<Vec<_>>(),
            "running external tool"
        );
        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);
        command
    }

    fn spawn_error(program: &str, source: io::Error) -> ProcessError {
        if source.kind() == io::ErrorKind::NotFound {
            ProcessError::NotFound {
                program: program.to_string(),
            }
        } else {
            ProcessError::Io {
                program: program.to_string(),
                source,
            }
        }
    }

    fn check(program: &str, status: ExitStatus, stderr: String) -> Result<(), ProcessError> {
        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::Failed {
                program: program.to_string(),
                code: status.code().unwrap_or(-1),
                stderr,
            })
        }
    }

    /// Runs a program and returns its standard output.
    ///
    /// # Errors
    ///
    /// Fails when the program cannot start or exits unsuccessfully.
    pub async fn output<S: AsRef<OsStr>>(
        &self,
        program: &str,
        args: &[S],
    ) -> Result<String, ProcessError> {
        let output = Self::command(program, args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::spawn_error(program, e))?;
        Self::check(
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).into_owned(),
        )?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs a program attached to the terminal.
    ///
    /// # Errors
    ///
    /// Fails when the program cannot start or exits unsuccessfully.
    pub async fn interactive<S: AsRef<OsStr>>(
        &self,
        program: &str,
        args: &[S],
    ) -> Result<(), ProcessError> {
        let status = Self::command(program, args)
            .status()
            .await
            .map_err(|e| Self::spawn_error(program, e))?;
        Self::check(program, status, String::new())
    }

    /// Runs a program attached to the terminal until it exits or `cancel`
    /// fires, in which case the child is killed.
    ///
    /// Returns false when cancelled.
    ///
    /// # Errors
    ///
    /// Fails when the program cannot start or exits unsuccessfully.
    pub async fn interactive_until<S: AsRef<OsStr>>(
        &self,
        program: &str,
        args: &[S],
        cancel: &CancellationToken,
    ) -> Result<bool, ProcessError> {
        let mut child = Self::command(program, args)
            .spawn()
            .map_err(|e| Self::spawn_error(program, e))?;
        tokio::select! {
            () = cancel.cancelled() => {
                child.kill().await.ok();
                tracing::debug!(program, "cancelled external tool");
                Ok(false)
            }
            status = child.wait() => {
                let status = status.map_err(|e| Self::spawn_error(program, e))?;
                Self::check(program, status, String::new())?;
                Ok(true)
            }
        }
    }

    /// Runs a program with its standard output written to `path`.
    ///
    /// Output goes to a `.part` file next to `path` that replaces it only
    /// once the program succeeds, so a failed run leaves `path` untouched.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be created or moved into place, or the
    /// program cannot start or exits unsuccessfully.
    pub async fn output_to_file<S: AsRef<OsStr>>(
        &self,
        program: &str,
        args: &[S],
        path: &Path,
    ) -> Result<(), ProcessError> {
        let partial = partial_path(path);
        let result = Self::write_output(program, args, &partial).await;
        let result = match result {
            Ok(()) => tokio::fs::rename(&partial, path)
                .await
                .map_err(|e| Self::spawn_error(program, e)),
            Err(e) => Err(e),
        };
        if result.is_err() {
            tokio::fs::remove_file(&partial).await.ok();
        }
        result
    }

    async fn write_output<S: AsRef<OsStr>>(
        program: &str,
        args: &[S],
        path: &Path,
    ) -> Result<(), ProcessError> {
        let file = tokio::fs::File::create(path)
            .await
            .map_err(|e| Self::spawn_error(program, e))?
            .into_std()
            .await;
        let output = Self::command(program, args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(file))
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Self::spawn_error(program, e))?;
        Self::check(
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).into_owned(),
        )
    }

    /// Runs a program with `path` as its standard input.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened, or the program cannot start
    /// or exits unsuccessfully.
    pub async fn input_from_file<S: AsRef<OsStr>>(
        &self,
        program: &str,
        args: &[S],
        path: &Path,
    ) -> Result<String, ProcessError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| Self::spawn_error(program, e))?
            .into_std()
            .await;
        let output = Self::command(program, args)
            .stdin(Stdio::from(file))
            .output()
            .await
            .map_err(|e| Self::spawn_error(program, e))?;
        Self::check(
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).into_owned(),
        )?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// `<path>.part`
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

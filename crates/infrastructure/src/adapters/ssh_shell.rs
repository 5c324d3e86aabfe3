//! Remote shell over the system `ssh` client

use std::process::Stdio;

use async_trait::async_trait;
use rhc_application::ports::{OutputStream, RemoteShell, RemoteShellError, ShellLine};
use rhc_domain::GearTarget;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

/// Exit status ssh uses for its own failures (connection, authentication).
const SSH_FAILURE: i32 = 255;

/// Runs commands on gears by spawning `ssh` in batch mode.
///
/// The child is killed when the session future is dropped, so cancelling
/// a multi-gear run closes every connection.
#[derive(Debug, Clone)]
pub struct SshProcessShell {
    program: String,
    options: Vec<String>,
}

impl Default for SshProcessShell {
    fn default() -> Self {
        Self::new("ssh")
    }
}

impl SshProcessShell {
    /// Uses the given ssh executable.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            options: vec!["-o".to_string(), "BatchMode=yes".to_string()],
        }
    }

    /// Adds an ssh option such as `-i <identity>`.
    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Full argument list for one session.
    fn args(&self, target: &GearTarget, command: &str) -> Vec<String> {
        let mut args = self.options.clone();
        args.push(target.destination());
        args.push(command.to_string());
        args
    }
}

/// Forwards each line of a stream; returns the last line seen.
///
/// Remote output is not guaranteed to be UTF-8, so invalid sequences are
/// replaced rather than ending the session.
async fn pump<R: AsyncRead + Unpin>(
    reader: R,
    stream: OutputStream,
    output: &UnboundedSender<ShellLine>,
) -> std::io::Result<Option<String>> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut last = None;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(last);
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let text = String::from_utf8_lossy(line).into_owned();
        output.send(ShellLine { stream, text: text.clone() }).ok();
        last = Some(text);
    }
}

#[async_trait]
impl RemoteShell for SshProcessShell {
    async fn execute(
        &self,
        target: &GearTarget,
        command: &str,
        output: UnboundedSender<ShellLine>,
    ) -> Result<i32, RemoteShellError> {
        let mut child = Command::new(&self.program)
            .args(self.args(target, command))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RemoteShellError::Spawn(format!("{}: {e}", self.program)))?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(RemoteShellError::Io("ssh output was not captured".to_string()));
        };

        let (stdout, stderr, status) = tokio::join!(
            pump(stdout, OutputStream::Stdout, &output),
            pump(stderr, OutputStream::Stderr, &output),
            child.wait()
        );
        stdout.map_err(|e| RemoteShellError::Io(e.to_string()))?;
        let last_error = stderr.map_err(|e| RemoteShellError::Io(e.to_string()))?;
        let status = status.map_err(|e| RemoteShellError::Io(e.to_string()))?;

        match status.code() {
            Some(SSH_FAILURE) => Err(RemoteShellError::Connect {
                destination: target.destination(),
                message: last_error.unwrap_or_else(|| "ssh exited with status 255".to_string()),
            }),
            Some(code) => Ok(code),
            None => Err(RemoteShellError::Io(format!(
                "ssh to {} was terminated by a signal",
                target.destination()
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    fn target() -> GearTarget {
        GearTarget {
            gear_id: "abc".to_string(),
            user: "abc".to_string(),
            host: "app-ns.example.com".to_string(),
            label: "abc php-5.4".to_string(),
        }
    }

    #[test]
    fn test_args() {
        let shell = SshProcessShell::default().with_option("-q");
        assert_eq!(
            shell.args(&target(), "uptime"),
            vec!["-o", "BatchMode=yes", "-q", "abc@app-ns.example.com", "uptime"]
        );
    }

    #[tokio::test]
    async fn test_pump_forwards_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let last = pump(&b"one\ntwo\n"[..], OutputStream::Stderr, &tx)
            .await
            .unwrap();
        drop(tx);
        assert_eq!(last.as_deref(), Some("two"));
        assert_eq!(rx.recv().await, Some(ShellLine::stderr("one")));
        assert_eq!(rx.recv().await, Some(ShellLine::stderr("two")));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_pump_replaces_invalid_utf8() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let last = pump(&b"ok\r\n\xff\xfe latin1\nno newline"[..], OutputStream::Stdout, &tx)
            .await
            .unwrap();
        drop(tx);
        assert_eq!(last.as_deref(), Some("no newline"));
        assert_eq!(rx.recv().await, Some(ShellLine::stdout("ok")));
        assert_eq!(rx.recv().await, Some(ShellLine::stdout("\u{fffd}\u{fffd} latin1")));
        assert_eq!(rx.recv().await, Some(ShellLine::stdout("no newline")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_survives_non_utf8_output() {
        // `sh -c <script> <destination> <command>`: the script stands in for ssh.
        let shell = SshProcessShell {
            program: "sh".to_string(),
            options: vec![
                "-c".to_string(),
                r"printf 'ok\n\377 latin1\nafter\n'; exit 3".to_string(),
            ],
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        let status = shell.execute(&target(), "uptime", tx).await.unwrap();
        assert_eq!(status, 3);

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line.text);
        }
        assert_eq!(lines, vec!["ok", "\u{fffd} latin1", "after"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let shell = SshProcessShell::new("/nonexistent/rhc-test-ssh");
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = shell.execute(&target(), "true", tx).await;
        assert!(matches!(result, Err(RemoteShellError::Spawn(_))));
    }
}

//! External command execution.
//!
//! All invocations of `git` and `dotnet` flow through the
//! [`CommandExecutor`] trait so the pipeline steps can be exercised in
//! isolation with a stub. The production implementation runs commands with
//! captured output and a hard timeout to prevent hangs on network issues.

use crate::error::Result;
use camino::Utf8Path;
use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Hard ceiling for any single external command (5 minutes).
const COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments, optionally in a working directory,
    /// and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command, including a timeout expiry.
    fn run(&self, cmd: &str, args: &[&str], cwd: Option<&Utf8Path>) -> Result<Output>;
}

/// Executes commands on the host system.
///
/// # Examples
///
/// ```no_run
/// use actions_toolbox::exec::{CommandExecutor, SystemCommandExecutor};
///
/// let executor = SystemCommandExecutor;
/// let output = executor.run("dotnet", &["--list-sdks"], None)?;
/// assert!(output.status.success());
/// # Ok::<(), actions_toolbox::error::ToolboxError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str], cwd: Option<&Utf8Path>) -> Result<Output> {
        let mut command = Command::new(cmd);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = cwd {
            command.current_dir(dir.as_std_path());
        }

        let mut child = command.spawn()?;

        // The pipes must be drained while the child runs; a child that
        // fills a pipe buffer blocks until someone reads it, which would
        // turn a successful command into a timeout.
        let stdout = drain_pipe(child.stdout.take());
        let stderr = drain_pipe(child.stderr.take());

        match child.wait_timeout(COMMAND_TIMEOUT)? {
            Some(status) => Ok(Output {
                status,
                stdout: stdout.join().unwrap_or_default(),
                stderr: stderr.join().unwrap_or_default(),
            }),
            None => {
                // Timeout - kill the process. The reader threads finish on
                // their own once the pipes close.
                let _ = child.kill();
                let _ = child.wait();
                Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!(
                        "{cmd} timed out after {} seconds",
                        COMMAND_TIMEOUT.as_secs()
                    ),
                )
                .into())
            }
        }
    }
}

/// Reads a child pipe to EOF on a background thread.
fn drain_pipe<R: Read + Send + 'static>(source: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut source) = source {
            let _ = source.read_to_end(&mut buffer);
        }
        buffer
    })
}

/// Extracts a trimmed stderr message from a failed command, falling back to
/// a placeholder when the command produced nothing.
pub(crate) fn stderr_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "unknown error".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{exit_status, failure_output};

    #[test]
    fn stderr_message_trims_output() {
        let output = failure_output("  fatal: not a repository  \n");
        assert_eq!(stderr_message(&output), "fatal: not a repository");
    }

    #[test]
    fn stderr_message_falls_back_when_empty() {
        let output = Output {
            status: exit_status(1),
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        assert_eq!(stderr_message(&output), "unknown error");
    }

    #[cfg(unix)]
    #[test]
    fn captures_both_output_streams() {
        let output = SystemCommandExecutor
            .run("sh", &["-c", "echo out; echo err >&2"], None)
            .expect("expected the command to run");
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "out\n");
        assert_eq!(String::from_utf8_lossy(&output.stderr), "err\n");
    }

    // Output well past the OS pipe buffer must not stall the wait.
    #[cfg(unix)]
    #[test]
    fn output_larger_than_the_pipe_buffer_completes() {
        let output = SystemCommandExecutor
            .run("sh", &["-c", "head -c 200000 /dev/zero"], None)
            .expect("expected the command to run");
        assert!(output.status.success());
        assert_eq!(output.stdout.len(), 200_000);
    }
}

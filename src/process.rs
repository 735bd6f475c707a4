//! Subprocess execution
//!
//! Every external command goes through a [`CommandRunner`]. The real runner
//! captures output, enforces a timeout and honours a cancellation token,
//! killing the child when either fires.

use std::fmt;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::error::InstallerError;

/// A command to run, with or without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Run a program directly with arguments
    Exec { program: String, args: Vec<String> },
    /// Run a command line through the shell interpreter
    Shell(String),
}

impl Invocation {
    pub fn exec<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exec {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shell(command: impl Into<String>) -> Self {
        Self::Shell(command.into())
    }

    /// Name used in error messages and logs
    #[must_use]
    pub fn program(&self) -> &str {
        match self {
            Self::Exec { program, .. } => program,
            Self::Shell(command) => command,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exec { program, args } => {
                write!(f, "{program}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Self::Shell(command) => write!(f, "{command}"),
        }
    }
}

/// Captured result of a successful process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    /// stdout followed by stderr
    pub output: String,
}

/// Runs invocations to completion
pub trait CommandRunner: Send + Sync {
    /// Run the invocation, failing on spawn errors and non-zero exit
    fn run(
        &self,
        invocation: &Invocation,
        timeout: Duration,
    ) -> impl Future<Output = Result<CommandOutput, InstallerError>> + Send;
}

/// Runner backed by real OS processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    shell: String,
    cancel: CancellationToken,
}

impl ProcessRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` to abort in-flight processes
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn build(&self, invocation: &Invocation) -> Command {
        let mut cmd = match invocation {
            Invocation::Exec { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            Invocation::Shell(command) => {
                let mut cmd = Command::new(&self.shell);
                cmd.arg("-c").arg(command);
                // Own process group, so every stage of a pipeline can be killed.
                // Exec children stay in ours so sudo can still prompt on the tty.
                #[cfg(unix)]
                cmd.process_group(0);
                cmd
            }
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Kill the process group led by `leader`
#[cfg(unix)]
fn kill_group(leader: Option<u32>) {
    let Some(pgid) = leader.and_then(|pid| libc::pid_t::try_from(pid).ok()) else {
        return;
    };
    // SAFETY: killpg only sends a signal; a stale group id fails with ESRCH
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(pgid, error = %std::io::Error::last_os_error(), "killpg failed");
    }
}

#[cfg(not(unix))]
const fn kill_group(_leader: Option<u32>) {}

impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        timeout: Duration,
    ) -> Result<CommandOutput, InstallerError> {
        let program = invocation.program().to_string();
        let spawn_name = match invocation {
            Invocation::Exec { program, .. } => program.as_str(),
            Invocation::Shell(_) => self.shell.as_str(),
        };

        tracing::debug!(command = %invocation, timeout_secs = timeout.as_secs(), "spawning");
        let child = self
            .build(invocation)
            .spawn()
            .map_err(|err| InstallerError::from_spawn(spawn_name, err))?;

        let group = match invocation {
            Invocation::Shell(_) => child.id(),
            Invocation::Exec { .. } => None,
        };

        // Dropping the future drops the child, which kills it; the rest of a
        // shell's group goes through kill_group
        let output = tokio::select! {
            result = child.wait_with_output() => {
                result.map_err(|source| InstallerError::Io { program: program.clone(), source })?
            }
            () = tokio::time::sleep(timeout) => {
                tracing::warn!(command = %invocation, "timed out, killing process group");
                kill_group(group);
                return Err(InstallerError::TimedOut { program, secs: timeout.as_secs() });
            }
            () = self.cancel.cancelled() => {
                tracing::info!(command = %invocation, "cancelled, killing process group");
                kill_group(group);
                return Err(InstallerError::Cancelled { program });
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let code = output.status.code();
        tracing::debug!(command = %invocation, ?code, "finished");

        if !output.status.success() {
            return Err(InstallerError::ProcessFailed {
                program,
                code,
                output: combined,
            });
        }

        Ok(CommandOutput {
            code,
            output: combined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::exec("hvym", ["icp-new-account"]);
        assert_eq!(inv.to_string(), "hvym icp-new-account");
        assert_eq!(inv.program(), "hvym");

        let inv = Invocation::shell("curl -L x | bash");
        assert_eq!(inv.to_string(), "curl -L x | bash");
    }

    #[tokio::test]
    async fn test_exec_captures_stdout() {
        let runner = ProcessRunner::new("sh");
        let out = runner
            .run(&Invocation::exec("echo", ["ONE-TWO"]), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out.output.trim(), "ONE-TWO");
        assert_eq!(out.code, Some(0));
    }

    #[tokio::test]
    async fn test_shell_combines_stdout_and_stderr() {
        let runner = ProcessRunner::new("sh");
        let out = runner
            .run(&Invocation::shell("echo out; echo err 1>&2"), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out.output, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let runner = ProcessRunner::new("sh");
        let err = runner
            .run(
                &Invocation::exec("/nonexistent/metavinci-test-binary", Vec::<String>::new()),
                TIMEOUT,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_executable_is_permission_denied() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("hvym");
        std::fs::write(&path, "#!/bin/sh\necho hi\n").unwrap();

        let runner = ProcessRunner::new("sh");
        let err = runner
            .run(
                &Invocation::exec(path.to_string_lossy(), Vec::<String>::new()),
                TIMEOUT,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_process_failed() {
        let runner = ProcessRunner::new("sh");
        let err = runner
            .run(&Invocation::shell("echo nope; exit 3"), TIMEOUT)
            .await
            .unwrap_err();
        match err {
            InstallerError::ProcessFailed { code, output, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(output.trim(), "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = ProcessRunner::new("sh");
        let err = runner
            .run(&Invocation::shell("sleep 5"), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
    }

    #[tokio::test]
    async fn test_cancellation_stops_process() {
        let cancel = CancellationToken::new();
        let runner = ProcessRunner::new("sh").with_cancellation(cancel.clone());
        cancel.cancel();
        let err = runner
            .run(&Invocation::shell("sleep 5"), TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_every_pipeline_stage() {
        let temp = tempfile::tempdir().unwrap();
        let flag = temp.path().join("late-stage");
        let command = format!("true | (sleep 1; touch {})", flag.display());

        let runner = ProcessRunner::new("sh");
        let err = runner
            .run(&Invocation::shell(command), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);

        tokio::time::sleep(Duration::from_millis(1800)).await;
        assert!(!flag.exists(), "pipeline stage outlived the timeout");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancellation_kills_every_pipeline_stage() {
        let temp = tempfile::tempdir().unwrap();
        let flag = temp.path().join("late-stage");
        let command = format!("true | (sleep 1; touch {})", flag.display());

        let cancel = CancellationToken::new();
        let runner = ProcessRunner::new("sh").with_cancellation(cancel.clone());
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let err = runner
            .run(&Invocation::shell(command), TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);

        tokio::time::sleep(Duration::from_millis(1800)).await;
        assert!(!flag.exists(), "pipeline stage outlived cancellation");
    }
}

#![allow(clippy::missing_errors_doc)]
use std::path::PathBuf;
use std::time::Duration;

use crate::error::InstallerError;
use crate::process::{CommandRunner, Invocation};

/// Passes single-argument commands through to the companion CLI
pub trait Forwarder {
    /// Run `<cli> <arg>` and return its output verbatim
    fn forward(
        &self,
        arg: &str,
    ) -> impl std::future::Future<Output = Result<String, InstallerError>> + Send;
}

/// Forwarder that runs the installed CLI binary
pub struct CliForwarder<R: CommandRunner> {
    binary: PathBuf,
    timeout: Duration,
    runner: R,
}

impl<R: CommandRunner> CliForwarder<R> {
    pub const fn new(binary: PathBuf, timeout: Duration, runner: R) -> Self {
        Self {
            binary,
            timeout,
            runner,
        }
    }
}

impl<R: CommandRunner> Forwarder for CliForwarder<R> {
    async fn forward(&self, arg: &str) -> Result<String, InstallerError> {
        let invocation = Invocation::exec(self.binary.to_string_lossy(), [arg]);
        tracing::info!(command = %invocation, "forwarding");
        let out = self.runner.run(&invocation, self.timeout).await?;
        Ok(out.output)
    }
}

//! Installation and verification of the companion CLI

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::error::InstallerError;
use crate::process::{CommandRunner, Invocation};

/// Everything the installer needs, resolved from [`Config`]
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    pub binary: PathBuf,
    pub health_arg: String,
    pub sentinel: String,
    pub splash_arg: String,
    pub install_command: String,
    pub command_timeout: Duration,
    pub install_timeout: Duration,
}

impl InstallerConfig {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            binary: config.cli_path(),
            health_arg: config.cli.health_arg.clone(),
            sentinel: config.cli.sentinel.clone(),
            splash_arg: config.cli.splash_arg.clone(),
            install_command: config.install.command.clone(),
            command_timeout: Duration::from_secs(config.cli.timeout_secs),
            install_timeout: Duration::from_secs(config.install.timeout_secs),
        }
    }
}

/// Why an install was performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    Missing,
    Unhealthy,
}

/// Outcome of [`Installer::ensure_ready`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    AlreadyHealthy,
    Installed { reason: InstallReason },
}

/// Ensures the companion CLI is present and answering its health check
pub struct Installer<R: CommandRunner> {
    config: InstallerConfig,
    runner: R,
}

impl<R: CommandRunner> Installer<R> {
    pub const fn new(config: InstallerConfig, runner: R) -> Self {
        Self { config, runner }
    }

    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.config.binary
    }

    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Whether the binary exists at the configured path
    #[must_use]
    pub fn check_presence(&self) -> bool {
        self.config.binary.is_file()
    }

    fn cli_invocation(&self, arg: &str) -> Invocation {
        Invocation::exec(self.config.binary.to_string_lossy(), [arg])
    }

    /// Run the health check and compare its trimmed output with the sentinel
    ///
    /// # Errors
    /// `HealthMismatch` when the CLI answers with anything else, or the
    /// runner error when it cannot be executed
    pub async fn check_health(&self) -> Result<(), InstallerError> {
        let invocation = self.cli_invocation(&self.config.health_arg);
        let out = self
            .runner
            .run(&invocation, self.config.command_timeout)
            .await?;

        let actual = out.output.trim();
        if actual == self.config.sentinel {
            tracing::info!("hvym is on path");
            Ok(())
        } else {
            Err(InstallerError::HealthMismatch {
                expected: self.config.sentinel.clone(),
                actual: actual.to_string(),
            })
        }
    }

    pub async fn is_healthy(&self) -> bool {
        match self.check_health().await {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(kind = ?err.kind(), "health check failed: {err}");
                false
            }
        }
    }

    /// Run the install command, then re-check health exactly once
    ///
    /// A failing install command is logged; the re-check decides the outcome.
    ///
    /// # Errors
    /// `InstallFailed` wrapping the health error when the CLI is still unhealthy
    pub async fn install(&self) -> Result<(), InstallerError> {
        tracing::info!(command = %self.config.install_command, "installing hvym");
        let invocation = Invocation::shell(&self.config.install_command);
        match self
            .runner
            .run(&invocation, self.config.install_timeout)
            .await
        {
            Ok(out) => tracing::debug!(output = %out.output.trim(), "install command finished"),
            Err(err) => tracing::warn!(kind = ?err.kind(), "install command failed: {err}"),
        }

        self.check_health().await.map_err(|source| {
            tracing::warn!("hvym not installed");
            InstallerError::InstallFailed {
                path: self.config.binary.clone(),
                source: Box::new(source),
            }
        })
    }

    /// Install when absent or unhealthy, otherwise do nothing
    ///
    /// # Errors
    /// Propagates [`Installer::install`] failures
    pub async fn ensure_ready(&self) -> Result<Readiness, InstallerError> {
        let reason = if !self.check_presence() {
            tracing::info!(path = %self.config.binary.display(), "hvym binary not found");
            InstallReason::Missing
        } else if let Err(err) = self.check_health().await {
            tracing::info!(kind = ?err.kind(), "hvym is installed but unhealthy: {err}");
            InstallReason::Unhealthy
        } else {
            return Ok(Readiness::AlreadyHealthy);
        };

        self.install().await?;
        Ok(Readiness::Installed { reason })
    }

    /// Show the CLI splash; output and failures are only logged
    pub async fn splash(&self) {
        let invocation = self.cli_invocation(&self.config.splash_arg);
        if let Err(err) = self
            .runner
            .run(&invocation, self.config.command_timeout)
            .await
        {
            tracing::warn!("splash failed: {err}");
        }
    }
}

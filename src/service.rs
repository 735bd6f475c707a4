#![allow(clippy::missing_errors_doc)]
use std::time::Duration;

use crate::config::ServiceConfig;
use crate::error::InstallerError;
use crate::process::{CommandRunner, Invocation};

const SERVICE_TIMEOUT: Duration = Duration::from_secs(60);

/// Service manager verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
}

impl ServiceAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

/// Starts and stops the background service through the system service manager
pub struct ServiceControl<R: CommandRunner> {
    config: ServiceConfig,
    runner: R,
}

impl<R: CommandRunner> ServiceControl<R> {
    pub const fn new(config: ServiceConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// `[sudo] <manager> <action> <name>`
    pub fn invocation(&self, action: ServiceAction) -> Invocation {
        let mut args = Vec::with_capacity(3);
        if self.config.sudo {
            args.push(self.config.manager.clone());
        }
        args.push(action.as_str().to_string());
        args.push(self.config.name.clone());

        if self.config.sudo {
            Invocation::exec("sudo", args)
        } else {
            Invocation::exec(self.config.manager.clone(), args)
        }
    }

    /// Run the action and return the manager's output
    pub async fn run(&self, action: ServiceAction) -> Result<String, InstallerError> {
        let invocation = self.invocation(action);
        tracing::info!(command = %invocation, "service {}", action.as_str());
        let out = self.runner.run(&invocation, SERVICE_TIMEOUT).await?;
        Ok(out.output)
    }
}

//! Common utility functions for command handlers
//!
//! This module contains shared helpers used across multiple commands.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::color::ColorMode;
use crate::config::Config;
use crate::forwarder::CliForwarder;
use crate::installer::{Installer, InstallerConfig};
use crate::process::ProcessRunner;
use crate::service::ServiceControl;

/// Loaded configuration plus per-invocation state shared by commands
pub struct AppContext {
    pub config: Config,
    pub color_mode: ColorMode,
    pub cancel: CancellationToken,
}

impl AppContext {
    /// Load configuration and build the context
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be loaded
    pub fn load(explicit_config: Option<&Path>, color_mode: ColorMode) -> Result<Self> {
        Ok(Self::new(Config::load(explicit_config)?, color_mode))
    }

    #[must_use]
    pub fn new(config: Config, color_mode: ColorMode) -> Self {
        Self {
            config,
            color_mode,
            cancel: CancellationToken::new(),
        }
    }

    /// Process runner tied to this context's cancellation token
    #[must_use]
    pub fn runner(&self) -> ProcessRunner {
        ProcessRunner::new(self.config.install.shell.clone()).with_cancellation(self.cancel.clone())
    }

    #[must_use]
    pub fn installer(&self) -> Installer<ProcessRunner> {
        Installer::new(InstallerConfig::from_config(&self.config), self.runner())
    }

    #[must_use]
    pub fn forwarder(&self) -> CliForwarder<ProcessRunner> {
        CliForwarder::new(
            self.config.cli_path(),
            Duration::from_secs(self.config.cli.timeout_secs),
            self.runner(),
        )
    }

    #[must_use]
    pub fn service(&self) -> ServiceControl<ProcessRunner> {
        ServiceControl::new(self.config.service.clone(), self.runner())
    }
}

/// Spinner on stderr, only when output is colorized (i.e. a terminal)
#[must_use]
pub fn spinner(color_mode: ColorMode, message: impl Into<String>) -> Option<ProgressBar> {
    if !color_mode.should_colorize() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Format duration for display (only if >= 100ms)
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 100 {
        String::new()
    } else if millis < 1000 {
        format!("({millis}ms)")
    } else {
        let secs = duration.as_secs_f64();
        format!("({secs:.1}s)")
    }
}

/// Print forwarded output verbatim to stdout
pub fn print_output(output: &str) {
    print!("{output}");
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }
}

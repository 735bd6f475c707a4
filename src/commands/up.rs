//! Up command - First-run setup and readiness check
//!
//! Installer problems never fail this command; they are reported as warnings
//! and the launcher carries on.

use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::color;
use crate::commands::common::{format_duration, spinner, AppContext};
use crate::config::Config;
use crate::installer::{InstallReason, Readiness};
use crate::setup::{run_first_setup, ServiceRegistration, SetupOutcome};
use crate::worker::{spawn_ensure_ready, Completion};

/// Upper bound for the background readiness check: one install plus the
/// health checks before and after it
fn readiness_deadline(config: &Config) -> Duration {
    let check = Duration::from_secs(config.cli.timeout_secs);
    Duration::from_secs(config.install.timeout_secs).saturating_add(check.saturating_mul(2))
}

async fn first_setup(ctx: &AppContext) -> Result<()> {
    let color_mode = ctx.color_mode;
    match run_first_setup(&ctx.config, &ctx.runner()).await? {
        SetupOutcome::AlreadyInitialized => {}
        SetupOutcome::Initialized { service } => {
            eprintln!(
                "{}",
                color::success(
                    color_mode,
                    format!(
                        "Initialized {}",
                        color::dim(color_mode, ctx.config.data_dir().display())
                    )
                )
            );
            match service {
                ServiceRegistration::Skipped => {
                    tracing::info!("no service setup script configured");
                }
                ServiceRegistration::Registered { output } => {
                    eprintln!("{}", color::success(color_mode, "Registered system service"));
                    if !output.trim().is_empty() {
                        eprintln!("{}", output.trim_end());
                    }
                }
                ServiceRegistration::Failed(err) => {
                    eprintln!(
                        "{}",
                        color::warn(color_mode, format!("Service registration failed: {err}"))
                    );
                }
            }
        }
    }
    Ok(())
}

/// Bring the launcher up
///
/// # Errors
/// Returns an error only if first-time setup cannot write its files
pub async fn cmd_up(ctx: &AppContext, skip_setup: bool) -> Result<()> {
    let color_mode = ctx.color_mode;

    if !skip_setup {
        first_setup(ctx).await?;
    }

    let installer = Arc::new(ctx.installer());
    let deadline = readiness_deadline(&ctx.config);

    let pb = spinner(color_mode, "Checking hvym");
    let start = Instant::now();
    let task = spawn_ensure_ready(Arc::clone(&installer), ctx.cancel.clone(), deadline);

    let token = task.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    let completion = task.completion().await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let elapsed = color::dim(color_mode, format_duration(start.elapsed()));

    match completion {
        Completion::Ready(readiness) => {
            let message = match readiness {
                Readiness::AlreadyHealthy => "hvym is ready",
                Readiness::Installed {
                    reason: InstallReason::Missing,
                } => "Installed hvym",
                Readiness::Installed {
                    reason: InstallReason::Unhealthy,
                } => "Reinstalled hvym",
            };
            eprintln!(
                "{}",
                color::success(color_mode, format!("{message} {elapsed}"))
            );
            // Still under the Ctrl-C guard: cancelling kills the splash process
            installer.splash().await;
        }
        Completion::Failed(err) => {
            tracing::debug!(kind = ?err.kind(), "readiness check failed");
            eprintln!(
                "{}",
                color::warn(color_mode, format!("hvym is not ready: {err}"))
            );
        }
        Completion::Cancelled => {
            eprintln!("{}", color::warn(color_mode, "Readiness check cancelled"));
        }
        Completion::TimedOut => {
            eprintln!(
                "{}",
                color::warn(
                    color_mode,
                    format!("Readiness check timed out after {}s", deadline.as_secs())
                )
            );
        }
    }
    interrupt.abort();

    eprintln!(
        "{}",
        color::info(
            color_mode,
            format!("Tray menu: {}", color_mode.highlight("metavinci menu"))
        )
    );
    Ok(())
}

//! Install command - Install hvym when missing or unhealthy

use anyhow::Result;
use std::time::Instant;

use crate::color;
use crate::commands::common::{format_duration, spinner, AppContext};
use crate::installer::Readiness;

/// Install hvym
///
/// With `force`, the install command runs even when hvym is healthy.
///
/// # Errors
/// Returns an error if hvym is still not healthy afterwards
pub async fn cmd_install(ctx: &AppContext, force: bool) -> Result<()> {
    let color_mode = ctx.color_mode;
    let installer = ctx.installer();

    let pb = spinner(color_mode, "Installing hvym");
    let start = Instant::now();
    let result = if force {
        installer.install().await.map(|()| None)
    } else {
        installer.ensure_ready().await.map(Some)
    };
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let elapsed = color::dim(color_mode, format_duration(start.elapsed()));

    let message = match result? {
        Some(Readiness::AlreadyHealthy) => "hvym is already installed and healthy",
        Some(Readiness::Installed { .. }) | None => "Installed hvym",
    };
    eprintln!(
        "{}",
        color::success(color_mode, format!("{message} {elapsed}"))
    );
    Ok(())
}

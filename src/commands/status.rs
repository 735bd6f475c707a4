//! Status command - Report CLI presence and health without installing

use anyhow::Result;

use crate::color;
use crate::commands::common::AppContext;
use crate::store::Store;

/// Print presence, health and first-run state
///
/// # Errors
/// Returns an error if hvym is missing or unhealthy
pub async fn cmd_status(ctx: &AppContext) -> Result<()> {
    let color_mode = ctx.color_mode;
    let installer = ctx.installer();
    let binary = installer.binary().display().to_string();

    let present = installer.check_presence();
    let health = if present {
        Some(installer.check_health().await)
    } else {
        None
    };

    let initialized = match Store::new(ctx.config.store_path()).is_initialized() {
        Ok(flag) => flag,
        Err(err) => {
            tracing::warn!("{err:#}");
            false
        }
    };

    let presence_line = if present {
        color::success(color_mode, format!("installed {}", color::dim(color_mode, &binary)))
    } else {
        color::error(color_mode, format!("missing {}", color::dim(color_mode, &binary)))
    };
    let health_line = match &health {
        Some(Ok(())) => color::success(color_mode, "health check passed".to_string()),
        Some(Err(err)) => color::error(color_mode, format!("health check failed: {err}")),
        None => color::warn(color_mode, "health check skipped".to_string()),
    };
    let init_line = if initialized {
        color::success(color_mode, "first-run setup done".to_string())
    } else {
        color::warn(color_mode, "first-run setup pending".to_string())
    };

    eprintln!("{}", color::info(color_mode, "hvym"));
    eprintln!("{}", color::tree_item(color_mode, presence_line, false, 1));
    eprintln!("{}", color::tree_item(color_mode, health_line, false, 1));
    eprintln!("{}", color::tree_item(color_mode, init_line, true, 1));

    match health {
        Some(Ok(())) => Ok(()),
        Some(Err(err)) => Err(err.into()),
        None => anyhow::bail!("hvym is not installed; run `metavinci install`"),
    }
}

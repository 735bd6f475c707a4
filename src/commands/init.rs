//! Init command - Write the configuration template

use anyhow::{Context, Result};
use std::path::Path;

use crate::color;
use crate::config;

/// Write the config template to `explicit` or the global config path
///
/// An existing file is left alone unless `force` is set.
///
/// # Errors
/// Returns an error if:
/// - Global config path cannot be determined
/// - File write fails
pub fn cmd_init(explicit: Option<&Path>, force: bool, color_mode: color::ColorMode) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::Config::global_config_path().context(
            "Could not determine config path (HOME directory not found). \
             Please set the HOME environment variable or XDG_CONFIG_HOME.",
        )?,
    };

    if path.exists() && !force {
        eprintln!(
            "{}",
            color::warn(
                color_mode,
                format!("Config already exists: {}", path.display())
            )
        );
        eprintln!("Use --force to overwrite");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    std::fs::write(&path, config::Config::template())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    eprintln!(
        "{}",
        color::success(
            color_mode,
            format!("Created config: {}", path.display())
        )
    );
    Ok(())
}

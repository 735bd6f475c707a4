//! Configuration loading logic

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::schema::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration with fallback
    ///
    /// Load priority:
    /// 1. Explicit path (`--config` / `METAVINCI_CONFIG`), which must exist
    /// 2. Global config (~/.config/metavinci/config.toml)
    /// 3. Default config
    ///
    /// # Errors
    /// Returns an error if the explicit file is missing, or if a config file
    /// exists but cannot be read or parsed
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading explicit config");
            return Self::from_file(path);
        }

        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                tracing::debug!(path = %global_config.display(), "loading global config");
                return Self::from_file(&global_config);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Get the global config path
    /// Respects `XDG_CONFIG_HOME` environment variable on all platforms.
    /// Fallback: `$HOME/.config/metavinci/config.toml`
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;

        Some(config_home.join("metavinci").join("config.toml"))
    }

    /// Resolved path of the companion CLI binary
    #[must_use]
    pub fn cli_path(&self) -> PathBuf {
        expand_home(&self.cli.path)
    }

    /// Resolved data directory
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.data.dir)
    }

    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join(&self.data.store)
    }

    #[must_use]
    pub fn marker_path(&self) -> PathBuf {
        self.data_dir().join(&self.data.marker)
    }
}

/// Expand a leading `~` or `~/` to the home directory
///
/// Paths are returned unchanged when the home directory is unknown.
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

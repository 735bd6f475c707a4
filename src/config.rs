//! Configuration module
//!
//! This module handles loading and managing metavinci configuration from TOML files.

pub mod loader;
pub mod schema;

pub use loader::expand_home;
pub use schema::{CliConfig, Config, DataConfig, InstallConfig, ServiceConfig};

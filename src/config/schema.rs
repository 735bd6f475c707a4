//! Configuration schema and type definitions

use serde::{Deserialize, Serialize};

/// Configuration for metavinci
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cli: CliConfig,
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// The companion CLI this launcher verifies and forwards to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Location of the installed binary (`~/` is expanded)
    #[serde(default = "default_cli_path")]
    pub path: String,
    /// Argument that makes the CLI print the sentinel
    #[serde(default = "default_health_arg")]
    pub health_arg: String,
    /// Expected (trimmed) health check output
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
    /// Argument invoked once the CLI is known to be healthy
    #[serde(default = "default_splash_arg")]
    pub splash_arg: String,
    /// Timeout for a single forwarded CLI invocation
    #[serde(default = "default_cli_timeout")]
    pub timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            path: default_cli_path(),
            health_arg: default_health_arg(),
            sentinel: default_sentinel(),
            splash_arg: default_splash_arg(),
            timeout_secs: default_cli_timeout(),
        }
    }
}

fn default_cli_path() -> String {
    "~/.local/share/heavymeta-cli/hvym".to_string()
}

fn default_health_arg() -> String {
    "check".to_string()
}

fn default_sentinel() -> String {
    "ONE-TWO".to_string()
}

fn default_splash_arg() -> String {
    "splash".to_string()
}

const fn default_cli_timeout() -> u64 {
    60
}

/// Remote installation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Shell command that installs the CLI
    #[serde(default = "default_install_command")]
    pub command: String,
    /// Interpreter used for shell commands (invoked with `-c`)
    #[serde(default = "default_shell")]
    pub shell: String,
    #[serde(default = "default_install_timeout")]
    pub timeout_secs: u64,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            command: default_install_command(),
            shell: default_shell(),
            timeout_secs: default_install_timeout(),
        }
    }
}

fn default_install_command() -> String {
    "curl -L https://github.com/inviti8/hvym/raw/main/install.sh | bash".to_string()
}

fn default_shell() -> String {
    "sh".to_string()
}

const fn default_install_timeout() -> u64 {
    600
}

/// System service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Service manager binary (`start`/`stop` are passed to it)
    #[serde(default = "default_service_manager")]
    pub manager: String,
    /// Prefix service commands with sudo
    #[serde(default = "default_sudo")]
    pub sudo: bool,
    /// Script registering the service on first run
    /// Invoked as `<script> <user> <data dir>`
    #[serde(default)]
    pub setup_script: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            manager: default_service_manager(),
            sudo: default_sudo(),
            setup_script: None,
        }
    }
}

fn default_service_name() -> String {
    "metavinci".to_string()
}

fn default_service_manager() -> String {
    "systemctl".to_string()
}

const fn default_sudo() -> bool {
    true
}

/// Local data directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
    /// Document store file name, relative to `dir`
    #[serde(default = "default_store")]
    pub store: String,
    /// First-run marker file name, relative to `dir`
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            store: default_store(),
            marker: default_marker(),
        }
    }
}

fn default_data_dir() -> String {
    "~/.metavinci".to_string()
}

fn default_store() -> String {
    "db.json".to_string()
}

fn default_marker() -> String {
    ".initialized".to_string()
}

/// Template for the configuration file
const TEMPLATE: &str = r#"# metavinci configuration
# Location: ~/.config/metavinci/config.toml
#
# Paths may start with "~/" to refer to the home directory.

[cli]
# Installed hvym binary
path = "~/.local/share/heavymeta-cli/hvym"
# Health check: `<path> <health_arg>` must print the sentinel
health_arg = "check"
sentinel = "ONE-TWO"
# Invoked once the CLI is healthy (output is ignored)
splash_arg = "splash"
# Timeout in seconds for forwarded commands
timeout_secs = 60

[install]
# Shell command installing the CLI when it is missing or unhealthy
command = "curl -L https://github.com/inviti8/hvym/raw/main/install.sh | bash"
# Interpreter used to run the command (invoked with -c)
shell = "sh"
timeout_secs = 600

[service]
name = "metavinci"
manager = "systemctl"
# Run `start`/`stop` through sudo
sudo = true
# Script registering the system service on first run (optional)
# Invoked as: sudo <setup_script> <user> <data dir>
# setup_script = "/usr/share/metavinci/service/start.sh"

[data]
dir = "~/.metavinci"
# Document store and first-run marker, relative to dir
store = "db.json"
marker = ".initialized"
"#;

impl Config {
    /// Get the configuration template
    #[must_use]
    pub const fn template() -> &'static str {
        TEMPLATE
    }
}

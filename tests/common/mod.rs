#![allow(dead_code, deprecated)]

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::Command;

/// Fake hvym that answers the health check and echoes account commands
pub const HEALTHY_CLI: &str = r#"#!/bin/sh
case "$1" in
  check) echo "ONE-TWO" ;;
  splash) echo "splash" ;;
  icp-new-account) echo "created account alice" ;;
  icp-set-account) echo "switched account" ;;
  *) echo "unknown: $1" >&2; exit 2 ;;
esac
"#;

/// Fake hvym whose health check prints the wrong sentinel
pub const BROKEN_CLI: &str = "#!/bin/sh\necho \"ONE\"\n";

/// Sandboxed HOME with a config that points every path inside it
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        dir.child("config").create_dir_all().unwrap();
        dir.child("data").create_dir_all().unwrap();
        let sandbox = Self { dir };
        sandbox.write_config("sh -c 'exit 1'");
        sandbox
    }

    pub fn cli_path(&self) -> PathBuf {
        self.dir.path().join("bin/hvym")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("metavinci.toml")
    }

    /// Rewrite the config with a different install command
    pub fn write_config(&self, install_command: &str) {
        self.write_config_with(install_command, 10, 20, "");
    }

    /// Rewrite the config with explicit timeouts and extra sections
    pub fn write_config_with(
        &self,
        install_command: &str,
        cli_timeout: u64,
        install_timeout: u64,
        extra: &str,
    ) {
        let content = format!(
            r#"[cli]
path = "{}"
timeout_secs = {cli_timeout}

[install]
command = "{}"
timeout_secs = {install_timeout}

[data]
dir = "{}"

{extra}
"#,
            self.cli_path().display(),
            install_command.replace('"', "\\\""),
            self.data_dir().display(),
        );
        fs::write(self.config_path(), content).unwrap();
    }

    /// Place a script at the configured CLI path
    pub fn install_cli(&self, script: &str) {
        write_script(&self.cli_path(), script);
    }

    /// Stage a script the install command can copy into place
    pub fn stage_installer(&self, script: &str) -> PathBuf {
        let staged = self.dir.path().join("staged/hvym");
        write_script(&staged, script);
        staged
    }

    /// `metavinci` isolated from the real HOME and config
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("metavinci").unwrap();
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("METAVINCI_CONFIG", self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

pub fn write_script(path: &std::path::Path, script: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

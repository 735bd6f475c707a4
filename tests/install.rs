#![cfg(unix)]
#![allow(deprecated)]

mod common;

use assert_cmd::prelude::*;
use common::{Sandbox, BROKEN_CLI, HEALTHY_CLI};
use predicates::prelude::*;

fn copy_command(sandbox: &Sandbox, staged: &std::path::Path) -> String {
    format!(
        "mkdir -p {dir} && cp {staged} {dir}/hvym && touch {ran}",
        dir = sandbox.cli_path().parent().unwrap().display(),
        staged = staged.display(),
        ran = sandbox.dir.path().join("install-ran").display(),
    )
}

#[test]
fn test_install_missing_cli() {
    let sandbox = Sandbox::new();
    let staged = sandbox.stage_installer(HEALTHY_CLI);
    sandbox.write_config(&copy_command(&sandbox, &staged));

    sandbox
        .command()
        .arg("install")
        .assert()
        .success()
        .stderr(predicate::str::contains("Installed hvym"));

    assert!(sandbox.cli_path().is_file());
}

#[test]
fn test_install_healthy_cli_is_a_no_op() {
    let sandbox = Sandbox::new();
    sandbox.install_cli(HEALTHY_CLI);
    let staged = sandbox.stage_installer(HEALTHY_CLI);
    sandbox.write_config(&copy_command(&sandbox, &staged));

    sandbox
        .command()
        .arg("install")
        .assert()
        .success()
        .stderr(predicate::str::contains("already installed and healthy"));

    assert!(!sandbox.dir.path().join("install-ran").exists());
}

#[test]
fn test_install_force_runs_install_command() {
    let sandbox = Sandbox::new();
    sandbox.install_cli(HEALTHY_CLI);
    let staged = sandbox.stage_installer(HEALTHY_CLI);
    sandbox.write_config(&copy_command(&sandbox, &staged));

    sandbox
        .command()
        .args(["install", "--force"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Installed hvym"));

    assert!(sandbox.dir.path().join("install-ran").exists());
}

#[test]
fn test_install_fails_when_cli_stays_unhealthy() {
    let sandbox = Sandbox::new();
    sandbox.install_cli(BROKEN_CLI);
    let staged = sandbox.stage_installer(BROKEN_CLI);
    sandbox.write_config(&copy_command(&sandbox, &staged));

    sandbox
        .command()
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ONE-TWO"));

    assert!(sandbox.dir.path().join("install-ran").exists());
}

#[test]
fn test_install_fails_when_install_command_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .command()
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Command failed with error"));

    assert!(!sandbox.cli_path().exists());
}

#![cfg(unix)]
#![allow(deprecated)]

mod common;

use assert_cmd::prelude::*;
use common::Sandbox;
use predicates::prelude::*;

#[test]
fn test_color_flag_accepted() {
    let sandbox = Sandbox::new();
    for mode in ["always", "auto", "never", "ALWAYS"] {
        sandbox
            .command()
            .args([&format!("--color={mode}"), "menu"])
            .assert()
            .success();
    }
}

#[test]
fn test_color_flag_invalid() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .args(["--color=invalid", "menu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'invalid'"));
}

#[test]
fn test_color_never_has_no_escape_codes() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .args(["--color=never", "action", "exit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_color_always_styles_messages() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .args(["--color=always", "action", "exit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\x1b["));
}

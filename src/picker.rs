#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
//! Interactive tray menu selection via fzf

use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

use crate::actions::Action;

/// Line shown in the picker for one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub display: String,
    pub id: &'static str,
}

impl MenuItem {
    pub fn from_action(action: &Action) -> Self {
        Self {
            display: format!("{:<16} {}", action.id, action.label),
            id: action.id,
        }
    }
}

/// Menu picker interface
pub trait MenuPicker {
    /// Return the picked id, or `None` when the user aborted
    fn pick(&self, items: &[MenuItem]) -> Result<Option<&'static str>>;
}

/// fzf-backed picker
#[derive(Debug, Default)]
pub struct FzfPicker;

impl MenuPicker for FzfPicker {
    fn pick(&self, items: &[MenuItem]) -> Result<Option<&'static str>> {
        if items.is_empty() {
            return Ok(None);
        }

        let input = items
            .iter()
            .map(|item| item.display.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut child = Command::new("fzf")
            .args(["--height=40%", "--reverse", "--border", "--prompt=metavinci> "])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit()) // fzf draws its UI on the terminal
            .spawn()
            .context("Failed to spawn fzf")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .context("Failed to write to fzf stdin")?;
        }

        let output = child.wait_with_output().context("Failed to wait for fzf")?;

        match output.status.code() {
            Some(0) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(select_item(items, stdout.trim_end_matches('\n')))
            }
            // Esc / no match
            Some(130 | 1) => Ok(None),
            Some(code) => anyhow::bail!("fzf exited with code {code}"),
            None => anyhow::bail!("fzf was terminated by signal"),
        }
    }
}

/// Map a picked display line back to its action id
pub fn select_item(items: &[MenuItem], line: &str) -> Option<&'static str> {
    items.iter().find(|item| item.display == line).map(|item| item.id)
}

/// Check if fzf is available in the system
pub fn is_fzf_available() -> bool {
    Command::new("fzf")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

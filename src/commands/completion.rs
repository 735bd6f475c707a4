//! Completion command - Print the line that hooks metavinci into a shell

use anyhow::Result;
use clap_complete::Shell;

/// Where the hook line goes and how it sources the dynamic completer
fn hook(shell: Shell) -> Option<(&'static str, &'static str)> {
    match shell {
        Shell::Bash => Some(("~/.bashrc", "source <(COMPLETE=bash metavinci)")),
        Shell::Zsh => Some(("~/.zshrc", "source <(COMPLETE=zsh metavinci)")),
        Shell::Fish => Some((
            "~/.config/fish/config.fish",
            "COMPLETE=fish metavinci | source",
        )),
        _ => None,
    }
}

/// Print setup instructions for `shell`
///
/// Completion is resolved at runtime, so action ids (`metavinci action <TAB>`)
/// always match the menu of the installed binary.
///
/// # Errors
/// Returns an error if the shell is unknown or has no hook
pub fn cmd_completion(shell: &str) -> Result<()> {
    let (rc_file, line) = shell
        .parse::<Shell>()
        .ok()
        .and_then(hook)
        .ok_or_else(|| anyhow::anyhow!("Invalid shell: {shell}. Supported shells: bash, zsh, fish"))?;

    println!("# Completes metavinci subcommands and tray action ids.");
    println!("# Add this line to {rc_file}:");
    println!("{line}");
    Ok(())
}

// CommandFactory is used by tests via Cli::command()
#[allow(unused_imports)]
use clap::CommandFactory;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::actions;

/// Installs, verifies and drives the hvym CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// When to use colored output
    #[arg(long, value_name = "WHEN", global = true, ignore_case = true)]
    pub color: Option<crate::color::ColorMode>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable diagnostic logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file to use instead of the global one
    #[arg(long, value_name = "PATH", global = true, env = "METAVINCI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Defaults to `up` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run first-time setup, make sure hvym is installed and healthy
    Up {
        /// Skip first-time setup (data directory, store, service)
        #[arg(long)]
        skip_setup: bool,
    },
    /// Start the system service
    Start,
    /// Stop the system service
    Stop,
    /// Show whether hvym is installed and healthy (never installs)
    Status,
    /// Install hvym if it is missing or unhealthy
    Install {
        /// Reinstall even if hvym is healthy
        #[arg(short, long)]
        force: bool,
    },
    /// List tray menu actions
    Menu {
        /// Pick an action interactively with fzf and run it
        #[arg(long)]
        pick: bool,
    },
    /// Run a tray menu action
    Action {
        /// Action id (see `metavinci menu`)
        #[arg(add = ArgValueCompleter::new(list_action_ids))]
        id: String,
    },
    /// Write the configuration template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        shell: String,
    },
}

impl Cli {
    /// The subcommand to run, `up` when none was given
    #[must_use]
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Up { skip_setup: false })
    }
}

/// Complete action ids matching the typed prefix
#[must_use]
pub fn list_action_ids(current: &OsStr) -> Vec<CompletionCandidate> {
    let prefix = current.to_string_lossy();
    actions::ACTIONS
        .iter()
        .filter(|action| action.id.starts_with(&*prefix))
        .map(|action| CompletionCandidate::new(action.id).help(Some(action.label.into())))
        .collect()
}

//! Menu command - List or pick tray menu actions

use anyhow::Result;

use crate::actions::ACTIONS;
use crate::color;
use crate::commands::action::cmd_action;
use crate::commands::common::AppContext;
use crate::picker::{is_fzf_available, FzfPicker, MenuItem, MenuPicker};

/// List the menu, or pick and run an action with fzf
///
/// # Errors
/// Returns an error if fzf is requested but unavailable, or the picked
/// action fails
pub async fn cmd_menu(ctx: &AppContext, pick: bool) -> Result<()> {
    let color_mode = ctx.color_mode;

    if !pick {
        for action in ACTIONS {
            println!(
                "{:<16} {}",
                action.id,
                color::dim(color_mode, action.label)
            );
        }
        return Ok(());
    }

    if !is_fzf_available() {
        anyhow::bail!("fzf is not installed; run `metavinci action <id>` instead");
    }

    let items: Vec<MenuItem> = ACTIONS.iter().map(MenuItem::from_action).collect();
    let picked = tokio::task::spawn_blocking(move || FzfPicker.pick(&items)).await??;

    match picked {
        Some(id) => cmd_action(ctx, id).await,
        None => Ok(()),
    }
}

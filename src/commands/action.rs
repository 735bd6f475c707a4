//! Action command - Dispatch a tray menu action

use anyhow::Result;

use crate::actions::{self, Dispatch};
use crate::color;
use crate::commands::common::{print_output, AppContext};

/// Run the action with the given id, printing forwarded output to stdout
///
/// # Errors
/// Returns an error if the id is unknown or the forwarded command fails
pub async fn cmd_action(ctx: &AppContext, id: &str) -> Result<()> {
    let Some(action) = actions::find(id) else {
        let known = actions::ids().collect::<Vec<_>>().join(", ");
        anyhow::bail!("Unknown action: {id}. Available actions: {known}");
    };

    match actions::dispatch(action, &ctx.forwarder()).await? {
        Dispatch::Output(output) => print_output(&output),
        Dispatch::Quit => {
            eprintln!("{}", color::info(ctx.color_mode, "Exiting"));
        }
    }
    Ok(())
}

//! Start/stop commands - Control the system service

use anyhow::Result;

use crate::color;
use crate::commands::common::{print_output, AppContext};
use crate::service::ServiceAction;

/// Run a service manager action and print its output
///
/// # Errors
/// Returns an error if the service manager cannot be run or fails
pub async fn cmd_service(ctx: &AppContext, action: ServiceAction) -> Result<()> {
    let output = ctx.service().run(action).await?;
    print_output(&output);

    let verb = match action {
        ServiceAction::Start => "Started",
        ServiceAction::Stop => "Stopped",
    };
    eprintln!(
        "{}",
        color::success(
            ctx.color_mode,
            format!("{verb} {}", ctx.color_mode.highlight(&ctx.config.service.name))
        )
    );
    Ok(())
}

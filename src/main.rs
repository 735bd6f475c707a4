use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::env::CompleteEnv;

use metavinci::cli::{Cli, Commands};
use metavinci::color::ColorMode;
use metavinci::commands::{self, common::AppContext};
use metavinci::logging;
use metavinci::service::ServiceAction;

#[tokio::main]
async fn main() -> Result<()> {
    // Handle dynamic completion via COMPLETE environment variable
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let color_mode = ColorMode::resolve(cli.color);
    let explicit_config = cli.config.as_deref();

    let context = || AppContext::load(explicit_config, color_mode);

    match cli.command_or_default() {
        Commands::Up { skip_setup } => commands::up::cmd_up(&context()?, skip_setup).await,
        Commands::Start => commands::service::cmd_service(&context()?, ServiceAction::Start).await,
        Commands::Stop => commands::service::cmd_service(&context()?, ServiceAction::Stop).await,
        Commands::Status => commands::status::cmd_status(&context()?).await,
        Commands::Install { force } => commands::install::cmd_install(&context()?, force).await,
        Commands::Menu { pick } => commands::menu::cmd_menu(&context()?, pick).await,
        Commands::Action { id } => commands::action::cmd_action(&context()?, &id).await,
        Commands::Init { force } => commands::init::cmd_init(explicit_config, force, color_mode),
        Commands::Completion { shell } => commands::completion::cmd_completion(&shell),
    }
}

//! Command dispatch after parsing and configuration loading.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;

/// Executes the parsed command; no subcommand means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => ServeCommandHandler::new(settings).execute(*dry_run).await,
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run }) => {
            MigrateCommandHandler::new(settings).execute(*dry_run).await?;
            Ok(())
        }
    }
}

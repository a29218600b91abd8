//! `db` subcommands

use clap::{Args, Subcommand};

mod ensure_app_role;

/// Database administration
#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    action: DbAction,
}

#[derive(Debug, Subcommand)]
enum DbAction {
    /// Create or refresh the non-superuser role the API server logs in as
    EnsureAppRole(ensure_app_role::EnsureAppRoleArgs),
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    let DbAction::EnsureAppRole(args) = command.action;

    ensure_app_role::run(args).await
}

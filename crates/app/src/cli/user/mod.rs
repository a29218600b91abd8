//! `user` subcommands

use clap::{Args, Subcommand};

mod create;

/// Manage order owners
#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    action: UserAction,
}

#[derive(Debug, Subcommand)]
enum UserAction {
    /// Register a user that tokens can be issued to
    Create(create::CreateUserArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    let UserAction::Create(args) = command.action;

    create::run(args).await
}

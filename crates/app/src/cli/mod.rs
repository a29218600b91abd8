use clap::{Parser, Subcommand};

mod db;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "threadline-app", about = "Threadline CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_token_revoke() {
        let parsed = Cli::try_parse_from([
            "threadline-app",
            "token",
            "revoke",
            "--database-url",
            "postgres://localhost/threadline",
            "--token-uuid",
            "0191f0c9-a3b0-7c52-a1e4-d2f1b0c9e8d7",
        ]);

        assert!(parsed.is_ok(), "expected token revoke to parse: {parsed:?}");
    }
}

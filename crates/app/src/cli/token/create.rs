use std::sync::Arc;

use clap::Args;
use jiff::Timestamp;
use threadline_app::{
    auth::{OpenBaoClient, OpenBaoConfig, PgAuthService},
    database,
    domain::users::records::UserUuid,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User that should own the token
    #[arg(long)]
    user_uuid: Uuid,

    /// OpenBao server address
    #[arg(long, env = "OPENBAO_ADDR")]
    openbao_addr: String,

    /// OpenBao authentication token
    #[arg(long, env = "OPENBAO_TOKEN", hide_env_values = true)]
    openbao_token: String,

    /// OpenBao Transit key name
    #[arg(long, env = "OPENBAO_TRANSIT_KEY")]
    openbao_transit_key: String,

    /// Optional expiry (RFC 3339)
    #[arg(long)]
    token_expires_at: Option<Timestamp>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    if let Some(expires_at) = args.token_expires_at
        && expires_at <= Timestamp::now()
    {
        return Err("token-expires-at must be in the future".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let openbao = OpenBaoClient::new(OpenBaoConfig {
        addr: args.openbao_addr,
        token: args.openbao_token,
        transit_key: args.openbao_transit_key,
    });

    let issued = PgAuthService::new(pool, Arc::new(openbao))
        .issue_api_token(UserUuid::from_uuid(args.user_uuid), args.token_expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_version: {}", issued.metadata.version.as_i16());
    println!("token_created_at: {}", issued.metadata.created_at);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("token_expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

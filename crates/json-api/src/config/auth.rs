//! Auth Config

use clap::Args;
use threadline_app::auth::OpenBaoConfig;

/// `OpenBao` Transit settings used to verify API tokens.
#[derive(Debug, Args)]
pub(crate) struct AuthConfig {
    /// `OpenBao` server address
    #[arg(long, env = "OPENBAO_ADDR")]
    pub openbao_addr: String,

    /// `OpenBao` authentication token
    #[arg(long, env = "OPENBAO_TOKEN", hide_env_values = true)]
    pub openbao_token: String,

    /// Transit key holding the API token HMAC key
    #[arg(long, env = "OPENBAO_TRANSIT_KEY")]
    pub openbao_transit_key: String,
}

impl From<AuthConfig> for OpenBaoConfig {
    fn from(config: AuthConfig) -> Self {
        Self {
            addr: config.openbao_addr,
            token: config.openbao_token,
            transit_key: config.openbao_transit_key,
        }
    }
}

//! Server configuration

use clap::Parser;

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

pub(crate) use observability::LogFormat;

/// Threadline JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "threadline-json", about = "Threadline JSON API Server", long_about = None)]
pub(crate) struct ServerConfig {
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(flatten)]
    pub observability: ObservabilityConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from `.env`, the environment and CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 9] = [
        "threadline-json",
        "--database-url",
        "postgres://localhost/threadline",
        "--openbao-addr",
        "http://localhost:8200",
        "--openbao-token",
        "root",
        "--openbao-transit-key",
        "api-tokens",
    ];

    #[test]
    fn command_definition_is_valid() {
        ServerConfig::command().debug_assert();
    }

    #[test]
    fn defaults_bind_all_interfaces_on_8698() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;

        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:8698");
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);
        assert!(matches!(config.logging.log_format, LogFormat::Compact));

        Ok(())
    }

    #[test]
    fn listener_address_is_typed() -> TestResult {
        let config = ServerConfig::try_parse_from(
            REQUIRED
                .into_iter()
                .chain(["--host", "127.0.0.1", "--port", "9000"]),
        )?;

        assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:9000");

        let bad_host =
            ServerConfig::try_parse_from(REQUIRED.into_iter().chain(["--host", "localhost"]));

        assert!(bad_host.is_err(), "hostnames are not accepted, only IPs");

        Ok(())
    }
}

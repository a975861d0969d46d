use std::net::SocketAddr;

use clap::{Parser, ValueEnum};
use relay::{RelayConfig, RelayError};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Relay process configuration.
///
/// Every value may be given as a flag or through its environment variable.
#[derive(Parser, Clone)]
#[command(
    name = "statuspage-relay",
    version,
    about = "Relays Statuspage incident webhooks to a Front application"
)]
pub struct CliConfig {
    /// Front API token (JWT).
    #[arg(long, env = "FRONT_API_KEY", hide_env_values = true)]
    pub front_api_key: String,

    /// UID of the Front application receiving app events (16 characters).
    #[arg(long, env = "FRONT_APP_UID")]
    pub front_app_uid: String,

    /// Public status page base URL, e.g. `https://status.example.com`.
    #[arg(long, env = "STATUSPAGE_URL")]
    pub statuspage_url: String,

    /// Front API origin.
    #[arg(long, env = "FRONT_API_BASE_URL", default_value = front::DEFAULT_BASE_URL)]
    pub front_api_base_url: String,

    /// Address the webhook listener binds.
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: SocketAddr,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP (gRPC) collector endpoint; spans are exported only when set.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl CliConfig {
    /// Validates the relay settings into the immutable [`RelayConfig`].
    pub fn relay_config(&self) -> Result<RelayConfig, RelayError> {
        RelayConfig::from_raw(
            &self.front_api_key,
            &self.front_app_uid,
            &self.statuspage_url,
        )
    }
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("front_api_key", &"<redacted>")
            .field("front_app_uid", &self.front_app_uid)
            .field("statuspage_url", &self.statuspage_url)
            .field("front_api_base_url", &self.front_api_base_url)
            .field("listen_addr", &self.listen_addr)
            .field("log_format", &self.log_format)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ0ZXN0In0.c2ln";

    fn parse(extra: &[&str]) -> Result<CliConfig, clap::Error> {
        let mut args = vec![
            "statuspage-relay",
            "--front-api-key",
            TOKEN,
            "--front-app-uid",
            "abcdef0123456789",
            "--statuspage-url",
            "https://status.example.com",
        ];
        args.extend_from_slice(extra);
        CliConfig::try_parse_from(args)
    }

    #[test]
    fn command_definition_is_valid() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn flags_build_relay_config() {
        let cli = parse(&["--listen-addr", "127.0.0.1:8080", "--log-format", "json"]).unwrap();
        assert_eq!(cli.listen_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cli.log_format, LogFormat::Json);

        let config = cli.relay_config().unwrap();
        assert_eq!(config.app_uid.as_str(), "abcdef0123456789");
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut cli = parse(&[]).unwrap();
        cli.front_app_uid = "too-short".into();
        assert!(matches!(
            cli.relay_config(),
            Err(RelayError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn debug_redacts_api_key() {
        let cli = parse(&[]).unwrap();
        assert!(!format!("{cli:?}").contains(TOKEN));
    }
}

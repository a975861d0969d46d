//! Statuspage relay entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: read flags / environment variables and validate
//!    them into an immutable [`relay::RelayConfig`]. Invalid values abort
//!    startup.
//! 2. **Wire observability**: configure `tracing-subscriber` (text or JSON)
//!    and, when an OTLP endpoint is configured, an OpenTelemetry exporter.
//! 3. **Construct infrastructure**: create the [`front::FrontClient`] and
//!    inject it into the [`relay::EventMapper`].
//! 4. **Serve**: run the webhook listener until SIGINT/SIGTERM.

mod config;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use front::FrontClient;
use relay::EventMapper;
use tracing::{error, info, warn};

use crate::config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let telemetry = telemetry::init(cli.log_format, cli.otlp_endpoint.as_deref())?;

    let result = run(cli).await;
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "Relay stopped");
    }

    telemetry.shutdown();
    result
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let config = Arc::new(cli.relay_config().context("invalid configuration")?);

    let client = FrontClient::new(config.clone())
        .context("build Front API client")?
        .with_base_url(&cli.front_api_base_url);
    info!(
        front_api = client.base_url(),
        app_uid = %config.app_uid,
        statuspage_url = %config.statuspage_url,
        "Relay configured"
    );

    let mapper = EventMapper::new(config, Arc::new(client));
    listener::serve(cli.listen_addr, mapper, shutdown_signal())
        .await
        .context("webhook listener")?;

    info!("Relay shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}

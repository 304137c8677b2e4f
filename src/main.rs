//! Provenance gateway entrypoint.
//!
//! Initializes tracing, loads and validates configuration, binds the
//! listener and runs the multipart HTTP server. The tunnel transport is
//! driven by the hosting tunnel layer through [`Pipeline::handle_tunnel`].

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use provenance_gateway::config::loader::{apply_env_overrides, load_config};
use provenance_gateway::config::validation::validate_config;
use provenance_gateway::config::GatewayConfig;
use provenance_gateway::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "provenance-gateway")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "provenance_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("provenance-gateway v0.1.0 starting");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = GatewayConfig::default();
            apply_env_overrides(&mut config);
            if let Err(errors) = validate_config(&config) {
                for error in &errors {
                    tracing::error!(error = %error, "configuration invalid");
                }
                return Err("configuration invalid".into());
            }
            config
        }
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_url = %config.backend.base_url,
        backend_timeout_secs = config.backend.timeout_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

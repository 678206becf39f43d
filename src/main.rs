//! FlowCraft Studio API service binary.
//!
//! Loads configuration, initializes tracing, constructs the one
//! process-wide metrics registry, and runs the HTTP server until a
//! shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowcraft_api::config::{load_config, ServiceConfig};
use flowcraft_api::http::HttpServer;
use flowcraft_api::metrics::MetricsRegistry;

#[derive(Parser, Debug)]
#[command(name = "flowcraft-api", about = "FlowCraft Studio API service")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener bind address from the config.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowcraft_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            tracing::info!("No config file given, using defaults");
            ServiceConfig::default()
        }
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    let registry = Arc::new(MetricsRegistry::new());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, registry);
    server.run(listener).await?;

    Ok(())
}

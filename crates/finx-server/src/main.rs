//! API Server Binary Entry Point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finx_core::FinxConfig;
use finx_server::{start_server, AppState};

#[derive(Parser)]
#[command(name = "finx-server")]
#[command(about = "Settlement report and invoice extraction API")]
#[command(version)]
struct Args {
    /// Configuration file (JSON)
    #[arg(short, long, env = "FINX_CONFIG")]
    config: Option<PathBuf>,

    /// Bind host, overriding the configuration file
    #[arg(long, env = "FINX_HOST")]
    host: Option<String>,

    /// Bind port, overriding the configuration file
    #[arg(long, env = "FINX_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finx_server=info,finx_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FinxConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => FinxConfig::default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let state = AppState::new(config).context("Failed to compile extraction profiles")?;

    start_server(state).await?;

    Ok(())
}

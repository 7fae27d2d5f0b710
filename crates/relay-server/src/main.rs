//! # relayd
//!
//! TCP group-chat broadcast relay.
//!
//! ## Usage
//!
//! ```bash
//! # Listen on port 9090 with default settings
//! relayd 9090
//!
//! # Custom config and chat log location
//! relayd 9090 --config /etc/relay/relay.toml --log-file /var/log/relay/chat.log
//!
//! # Host override via environment
//! RELAY_HOST=127.0.0.1 relayd 9090
//! ```

use anyhow::Result;
use clap::Parser;
use relay_server::{metrics, Config, Server};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "relayd", version, about = "TCP group-chat broadcast relay")]
struct Cli {
    /// Port to listen on.
    port: u16,

    /// Path to a TOML config file (default: relay.toml discovery).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chat log file, overriding the config.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "relay_server=info,relay_core=info,relay_transport=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration; the CLI port always wins.
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    config.port = cli.port;
    if let Some(path) = cli.log_file {
        config.log.file = path;
    }

    metrics::init_metrics();
    if config.metrics.enabled {
        if let Err(e) = metrics::start_metrics_server(config.metrics.port) {
            tracing::error!("Failed to start metrics server: {}", e);
        }
    }

    let server = Server::bind(config).await?;
    server.run().await
}

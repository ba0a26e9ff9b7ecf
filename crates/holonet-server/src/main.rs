//! CLI entry point for the holonet-server HTTP service.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use holonet_graph::MemoryStore;
use holonet_server::server::{serve, serve_with};
use holonet_server::ServerConfig;

#[derive(Parser)]
#[command(name = "holonet-server")]
#[command(about = "HTTP CRUD service for Character nodes in Neo4j")]
struct Cli {
    /// Config file prefix (default: holonet).
    #[arg(short, long, default_value = "holonet")]
    config: String,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep Characters in process memory instead of Neo4j. Nothing persists
    /// across restarts.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(&cli.config)?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    if cli.in_memory {
        tracing::warn!("Serving from the in-memory store; data is lost on exit");
        serve_with(MemoryStore::new(), &config).await?;
    } else {
        serve(config).await?;
    }
    Ok(())
}

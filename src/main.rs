use anyhow::{Context, Result};
use clap::Parser;
use roomcast::{ChatConfig, ChatServer, TcpChatServer};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomcast")]
#[command(about = "Line-based multi-room TCP chat server")]
struct Args {
    /// Address to bind to
    #[arg(short = 'b', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ChatConfig::load(args.config.as_deref()).context("failed to load config")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .init();

    let (server, _dispatcher) = ChatServer::start(&config);
    let mut tcp = TcpChatServer::new(server);
    tcp.bind_addr(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!(addr = %tcp.local_addr()?, "starting chat server");

    tokio::select! {
        result = tcp.listen() => result.context("chat server stopped")?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    Ok(())
}

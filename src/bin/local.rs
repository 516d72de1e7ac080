//! Veilsocks local endpoint
//!
//! Runs the local SOCKS5 listener and forwards every connection to the
//! configured remote relay through the substitution cipher.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use veilsocks::cipher::Cipher;
use veilsocks::config::Config;
use veilsocks::proxy::Socks5Server;

/// Veilsocks local endpoint - obfuscating SOCKS5 forwarder
#[derive(Parser, Debug)]
#[command(name = "veilsocks-local")]
#[command(about = "Local SOCKS5 proxy forwarding through an obfuscated relay")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Remote relay host (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    /// Remote relay port (overrides config)
    #[arg(short = 'p', long)]
    server_port: Option<u16>,

    /// Cipher passphrase (overrides config)
    #[arg(short = 'k', long)]
    password: Option<String>,

    /// Local SOCKS5 listen port (overrides config)
    #[arg(short = 'l', long)]
    local_port: Option<u16>,

    /// Connect to the remote relay over IPv6
    #[arg(short = '6', long)]
    ipv6: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    let mut config = Config::load(&args.config).context("Failed to load configuration")?;

    // Command-line flags win over the config file.
    if let Some(server) = args.server {
        config.server = server;
    }
    if let Some(port) = args.server_port {
        config.server_port = port;
    }
    if let Some(password) = args.password {
        config.password = password;
    }
    if let Some(port) = args.local_port {
        config.local_port = port;
    }
    if args.ipv6 {
        config.ipv6 = true;
    }

    info!("veilsocks-local v{}", veilsocks::VERSION);
    info!("Remote relay: {}:{}", config.server, config.server_port);

    let cipher = Arc::new(Cipher::new(config.password.as_bytes()));

    let server = Socks5Server::bind(config.local_port)
        .await
        .context("Failed to bind local port")?;

    let config = Arc::new(config);
    tokio::select! {
        result = server.run(cipher, config) => {
            result.context("Listener failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    Ok(())
}

mod executor;
mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use edge_tunnel_common::constants::{
    DEFAULT_LOCAL_PORT, RECONNECT_MAX_DELAY_SECS, RECONNECT_MIN_DELAY_SECS, REQUEST_TIMEOUT_SECS,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::executor::LocalExecutor;
use crate::session::{SessionEnd, TunnelSession};

/// CLI arguments for the edge tunnel agent
#[derive(Parser, Debug)]
#[command(name = "eta")]
#[command(about = "Edge tunnel agent: forwards public HTTP requests to a local server", long_about = None)]
#[command(version)]
struct Args {
    /// WebSocket URL of the edge gateway
    #[arg(short, long, env = "ETA_EDGE_URL", default_value = "ws://localhost:8000")]
    edge_url: String,

    /// Local HTTP port to forward requests to
    #[arg(short, long, default_value_t = DEFAULT_LOCAL_PORT)]
    local_port: u16,

    /// Tunnel token, sent as an X-Tunnel-Token header when set
    #[arg(short, long, env = "ETA_TUNNEL_TOKEN")]
    token: Option<String>,

    /// Timeout for forwarded local requests in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Do not reconnect on disconnect
    #[arg(long)]
    no_reconnect: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    debug: bool,
}

/// Configuration for the agent
#[derive(Debug, Clone)]
struct Config {
    edge_url: String,
    local_port: u16,
    token: Option<String>,
    request_timeout: Duration,
    reconnect: bool,
}

impl Config {
    fn from_args(args: Args) -> Self {
        Self {
            edge_url: args.edge_url,
            local_port: args.local_port,
            token: args.token,
            request_timeout: Duration::from_secs(args.timeout),
            reconnect: !args.no_reconnect,
        }
    }
}

/// Exponential reconnect backoff, threaded explicitly through the supervisor
/// loop: doubles per failed attempt, capped, reset on successful connect.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Backoff {
    delay: Duration,
}

impl Backoff {
    fn new() -> Self {
        Self {
            delay: Duration::from_secs(RECONNECT_MIN_DELAY_SECS),
        }
    }

    /// The delay to sleep before the next attempt; doubles for the one after
    fn next_delay(&mut self) -> Duration {
        let delay = self.delay;
        self.delay = (self.delay * 2).min(Duration::from_secs(RECONNECT_MAX_DELAY_SECS));
        delay
    }

    /// Called when a connection is established; only sustained successful
    /// connections clear the backoff, so a flapping link still backs off
    fn reset(&mut self) {
        self.delay = Duration::from_secs(RECONNECT_MIN_DELAY_SECS);
    }
}

/// Run tunnel sessions until the gateway requests shutdown (or forever),
/// reconnecting with exponential backoff
async fn run_supervisor(config: Config) -> Result<()> {
    let executor = Arc::new(LocalExecutor::new(config.local_port, config.request_timeout)?);
    let mut backoff = Backoff::new();

    loop {
        match TunnelSession::connect(&config.edge_url, config.token.as_deref()).await {
            Ok(session) => {
                backoff.reset();
                match session.run(executor.clone()).await {
                    SessionEnd::Shutdown => {
                        info!("Gateway requested shutdown, exiting");
                        return Ok(());
                    }
                    SessionEnd::Dropped => warn!("Connection lost"),
                }
            }
            Err(e) => error!("Failed to connect: {e}"),
        }

        if !config.reconnect {
            return Ok(());
        }

        let delay = backoff.next_delay();
        info!("Reconnecting in {delay:?}");
        tokio::time::sleep(delay).await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Edge tunnel agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Edge gateway: {}", args.edge_url);
    info!("Local server: http://127.0.0.1:{}", args.local_port);

    let config = Config::from_args(args);

    tokio::select! {
        result = run_supervisor(config) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, exiting");
            Ok(())
        }
    }
}

//! Standalone relay server binary.

use std::path::PathBuf;

use clap::Parser;

use chessmate_common::Result;
use chessmate_config::RelayConfig;
use chessmate_relay::{server, Matchmaker};

#[derive(Parser)]
#[command(name = "chessmate-relay", about = "Matchmaking relay for chessmate games")]
struct Args {
    /// Config file (defaults to the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds a player may wait for an opponent (0 = forever).
    #[arg(long)]
    waiting_ttl: Option<u32>,
}

impl Args {
    fn apply(&self, config: &mut RelayConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ttl) = self.waiting_ttl {
            config.matchmaking.waiting_ttl_secs = ttl;
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logging is not up yet, so report config trouble on stderr.
    let config = chessmate_config::load_config(args.config.as_deref(), |config| {
        args.apply(config)
    })
    .unwrap_or_else(|e| {
        eprintln!("chessmate-relay: {e}");
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("chessmate_relay={}", config.logging.level.as_directive()).into()
            }),
        )
        .init();

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Relay stopped");
        std::process::exit(1);
    }
}

async fn run(config: RelayConfig) -> Result<()> {
    let listener = server::bind(&config.server).await?;

    tracing::info!(
        "chessmate-relay listening on {}{}",
        listener.local_addr()?,
        config.server.path
    );

    let matchmaker = Matchmaker::new();

    if let Some(ttl) = config.matchmaking.waiting_ttl() {
        tracing::info!(ttl_secs = ttl.as_secs(), "Waiting players will be dropped after the TTL");
        matchmaker.spawn_reaper(ttl, config.matchmaking.reap_interval());
    }

    server::serve(listener, config.server, matchmaker).await;
    Ok(())
}

use anyhow::Context;
use clap::Parser;
use groupclick_execution::{FileStore, Store};
use groupclick_server::{config::Config, spawn_snapshots, Api, Hub};
use groupclick_types::economy::MOCK_LATENCY_MS;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    port: Option<u16>,

    /// YAML config file; every field is optional.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to load and save the economy snapshot.
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    #[arg(short, long)]
    log_level: Option<String>,

    /// Delay every command like the single-player mock backend.
    #[arg(long)]
    mock_latency: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) => Config::load(path).context("failed to load config")?,
        None => Config::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(snapshot) = &args.snapshot {
        config.snapshot = Some(snapshot.display().to_string());
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    if args.mock_latency {
        config.latency_ms = MOCK_LATENCY_MS;
    }
    let config = config.validate().context("invalid config")?;

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // Restore economy
    let store = config.snapshot.clone().map(|path| Arc::new(FileStore::new(path)));
    let snapshot = match &store {
        Some(store) => store
            .load()
            .with_context(|| format!("failed to load snapshot from {}", store.path().display()))?,
        None => None,
    };
    if let Some(snapshot) = &snapshot {
        info!(
            players_dropped = snapshot.players.len(),
            "Restored groups and rates from snapshot"
        );
    }
    let hub = Arc::new(Hub::new(config.settings(), snapshot));

    // Save periodically
    let snapshots = match (&store, config.snapshot_interval) {
        (Some(store), Some(every)) => Some(spawn_snapshots(hub.clone(), store.clone(), every)),
        _ => None,
    };

    let api = Api::new(hub.clone());
    let app = api.router();

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("axum server error")?;

    // Final save
    if let Some(handle) = snapshots {
        handle.abort();
    }
    if let Some(store) = &store {
        hub.save(store.as_ref())
            .with_context(|| format!("failed to save snapshot to {}", store.path().display()))?;
        info!("Saved snapshot to {}", store.path().display());
    }

    Ok(())
}

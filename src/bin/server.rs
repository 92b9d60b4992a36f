//! KCVStore Server Binary
//!
//! Starts the TCP server for KCVStore.

use std::sync::Arc;

use clap::Parser;
use kcvstore::network::Server;
use kcvstore::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// KCVStore Server
#[derive(Parser, Debug)]
#[command(name = "kcvstore-server")]
#[command(about = "Key/column/value store with sorted column slices")]
#[command(version)]
struct Args {
    /// Snapshot file rewritten after every mutation
    #[arg(short, long, default_value = "./kcvstore.snapshot")]
    snapshot: String,

    /// Keep data in memory only (ignores --snapshot)
    #[arg(long)]
    in_memory: bool,

    /// Skip fsync after each snapshot rewrite
    #[arg(long)]
    no_sync: bool,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    listen: String,

    /// Maximum queued connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "4")]
    workers: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kcvstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("KCVStore Server v{}", kcvstore::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let mut builder = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .worker_threads(args.workers)
        .sync_on_save(!args.no_sync);

    builder = if args.in_memory {
        tracing::info!("Snapshot: disabled (in-memory)");
        builder.in_memory()
    } else {
        tracing::info!("Snapshot: {}", args.snapshot);
        builder.snapshot_path(&args.snapshot)
    };

    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized with {} keys", engine.key_count());

    let mut server = Server::new(config, engine);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

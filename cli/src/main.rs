//! subcollect — Subspace chain data collector daemon.
//!
//! Runs two periodic tasks against a squid GraphQL endpoint until
//! interrupted: the block ingestion loop and the pledged-space tracker,
//! both persisting into one SQLite database.
//!
//! ```bash
//! subcollect --db subspace.db --start-height 1413838
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use subcollect_client::{SquidClient, DEFAULT_ENDPOINT};
use subcollect_core::Store;
use subcollect_ingest::{Collector, CollectorConfig, SpaceTracker, SpaceTrackerConfig};
use subcollect_storage::SqliteStore;

#[derive(Parser)]
#[command(name = "subcollect", version, about = "Subspace chain data collector")]
struct Args {
    /// Path to the SQLite database (created if missing).
    #[arg(long, default_value = "subcollect.db")]
    db: String,

    /// Squid GraphQL endpoint to collect from.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Height to start collecting at; persisted progress wins when ahead.
    #[arg(long, default_value_t = 0)]
    start_height: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let store = SqliteStore::open(&args.db)
        .await
        .with_context(|| format!("open database {}", args.db))?;
    let store: Arc<dyn Store> = Arc::new(store);
    let client = Arc::new(SquidClient::default_for(&args.endpoint)?);

    let collector = Collector::resume(
        Arc::clone(&client),
        Arc::clone(&store),
        CollectorConfig {
            start_height: args.start_height,
            ..Default::default()
        },
    )
    .await
    .context("resolve start height")?;

    let tracker = SpaceTracker::resume(client, store, SpaceTrackerConfig::default())
        .await
        .context("seed space tracker")?;

    let cancel = CancellationToken::new();
    let collector_task = tokio::spawn(collector.run(cancel.clone()));
    let tracker_task = tokio::spawn(tracker.run(cancel.clone()));

    tokio::signal::ctrl_c().await.context("wait for ctrl-c")?;
    tracing::info!("shutting down");
    cancel.cancel();

    let _ = collector_task.await;
    let _ = tracker_task.await;
    Ok(())
}

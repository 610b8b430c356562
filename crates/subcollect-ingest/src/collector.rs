//! The block ingestion loop.
//!
//! One height per cycle, strictly sequential. A cycle is: 3-way concurrent
//! fetch (block, extrinsics, events) joined before anything else happens;
//! persist; enrich; advance-or-retry. Failure handling is deliberately
//! asymmetric:
//!
//! - fan-out failure, block-save failure, or enrichment failure leave the
//!   height untouched so the next tick retries the same block;
//! - an individual extrinsic/event save failure only drops that record —
//!   siblings continue and the height still advances.
//!
//! A `NotFound` from the fan-out means the chain has not produced the
//! height yet; the loop stretches its polling interval instead of
//! hot-looping at the head.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use subcollect_client::ChainClient;
use subcollect_core::{resolve_start_height, CollectError, Height, Store};

use crate::enrich::Enricher;

/// Configuration for the ingestion loop.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// First height to ingest; superseded by persisted progress when that
    /// is further along.
    pub start_height: Height,
    /// Tick period while keeping up with the chain.
    pub poll_interval: Duration,
    /// Tick period after the chain head has been reached.
    pub not_found_backoff: Duration,
    /// Bounded concurrency for farmer-vote enrichment.
    pub enrich_concurrency: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            start_height: 0,
            poll_interval: Duration::from_millis(500),
            not_found_backoff: Duration::from_secs(2),
            enrich_concurrency: 10,
        }
    }
}

/// The per-height ingestion driver.
pub struct Collector<C> {
    client: Arc<C>,
    store: Arc<dyn Store>,
    enricher: Enricher<C>,
    height: Height,
    poll_interval: Duration,
    not_found_backoff: Duration,
}

impl<C: ChainClient + 'static> Collector<C> {
    /// Build a collector, resuming from persisted progress.
    ///
    /// The start height is the greater of the configured height and the
    /// highest height among recently persisted extrinsics. This is the one
    /// failure that propagates to the process entry point.
    pub async fn resume(
        client: Arc<C>,
        store: Arc<dyn Store>,
        config: CollectorConfig,
    ) -> Result<Self, CollectError> {
        let recent = store.recent_extrinsics(10).await?;
        let latest = recent.first().map(|e| e.height);
        let height = resolve_start_height(config.start_height, latest);
        tracing::info!(height, "collector starting");

        let enricher = Enricher::new(
            Arc::clone(&client),
            Arc::clone(&store),
            config.enrich_concurrency,
        );
        Ok(Self {
            client,
            store,
            enricher,
            height,
            poll_interval: config.poll_interval,
            not_found_backoff: config.not_found_backoff,
        })
    }

    /// The next height the collector will ingest.
    pub fn height(&self) -> Height {
        self.height
    }

    /// Run one collection cycle. On success the height has advanced by
    /// exactly one; on error it is unchanged and the same height is retried.
    pub async fn step(&mut self) -> Result<(), CollectError> {
        let height = self.height;

        let fetch_started = Instant::now();
        let (block_res, extrinsics_res, events_res) = tokio::join!(
            self.client.block_by_height(height),
            self.client.extrinsics_by_height(height),
            self.client.events_by_height(height),
        );
        let (block, extrinsics, events) = match (block_res, extrinsics_res, events_res) {
            (Ok(block), Ok(extrinsics), Ok(events)) => (block, extrinsics, events),
            (block, extrinsics, events) => {
                return Err(combine_fetch_errors(
                    height,
                    block.err(),
                    extrinsics.err(),
                    events.err(),
                ));
            }
        };
        let fetch_took = fetch_started.elapsed();

        // The block record is the anchor; failing to persist it aborts the cycle.
        self.store.save_block(&block).await?;

        // Individual extrinsic/event save failures drop that record only.
        for extrinsic in &extrinsics {
            if let Err(e) = self.store.save_extrinsic(extrinsic).await {
                tracing::warn!(id = %extrinsic.id, error = %e, "save extrinsic failed, skipping");
            }
        }
        for event in &events {
            if let Err(e) = self.store.save_event(event).await {
                tracing::warn!(id = %event.id, error = %e, "save event failed, skipping");
            }
        }

        let enrich_started = Instant::now();
        self.enricher.enrich_block(&block, &events).await?;
        let enrich_took = enrich_started.elapsed();

        self.height += 1;
        tracing::info!(
            height,
            extrinsics = extrinsics.len(),
            events = events.len(),
            fetch_ms = fetch_took.as_millis() as u64,
            enrich_ms = enrich_took.as_millis() as u64,
            "block collected"
        );
        Ok(())
    }

    /// Drive [`step`](Self::step) until cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut delay = self.poll_interval;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(height = self.height, "collector stopped");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            delay = match self.step().await {
                Ok(()) => self.poll_interval,
                Err(e) if e.is_not_found() => {
                    tracing::debug!(height = self.height, "height not produced yet, backing off");
                    self.not_found_backoff
                }
                Err(e) => {
                    tracing::error!(height = self.height, error = %e, "collection cycle failed");
                    self.poll_interval
                }
            };
        }
    }
}

/// Collapse the three fan-out results into one reported error.
///
/// `NotFound` wins so the loop can tell "head reached" apart from real
/// failures; otherwise all messages are combined, mirroring how the fetches
/// ran together.
fn combine_fetch_errors(
    height: Height,
    block: Option<CollectError>,
    extrinsics: Option<CollectError>,
    events: Option<CollectError>,
) -> CollectError {
    if matches!(block, Some(CollectError::NotFound { .. })) {
        return CollectError::NotFound { height };
    }
    let fmt = |e: Option<CollectError>| e.map_or_else(|| "ok".to_string(), |e| e.to_string());
    CollectError::Other(format!(
        "query block: {}, extrinsics: {}, events: {}",
        fmt(block),
        fmt(extrinsics),
        fmt(events)
    ))
}

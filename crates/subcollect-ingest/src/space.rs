//! Pledged-space tracking.
//!
//! An independent once-a-minute sampler of the network's total pledged
//! space. Samples are cheap to take but noisy to store, so a
//! change-detection policy decides which ones persist: the first sample
//! ever, any sample whose value differs from the last recorded one, and a
//! periodic heartbeat once a full adjustment window has elapsed even when
//! the value is flat.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use subcollect_client::ChainClient;
use subcollect_core::{CollectError, SpaceSample, Store};

/// Seconds in one pledged-space adjustment window: 2016 timeslots of 6s.
pub const ADJUST_INTERVAL_SECS: i64 = 2016 * 6;

/// Whether a fresh sample should be persisted, given the last recorded one.
pub fn should_record(
    prev: Option<&SpaceSample>,
    fresh: &SpaceSample,
    adjust_interval_secs: i64,
) -> bool {
    match prev {
        None => true,
        Some(prev) => {
            fresh.timestamp - prev.timestamp >= adjust_interval_secs
                || fresh.pledged != prev.pledged
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpaceTrackerConfig {
    /// Sampling period.
    pub interval: Duration,
    /// Heartbeat window after which a flat value is persisted anyway.
    pub adjust_interval_secs: i64,
}

impl Default for SpaceTrackerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            adjust_interval_secs: ADJUST_INTERVAL_SECS,
        }
    }
}

/// Periodic pledged-space sampler with change-detection persistence.
pub struct SpaceTracker<C> {
    client: Arc<C>,
    store: Arc<dyn Store>,
    /// Last sample that passed the policy; seeds the elapsed clock.
    last: Option<SpaceSample>,
    interval: Duration,
    adjust_interval_secs: i64,
}

impl<C: ChainClient + 'static> SpaceTracker<C> {
    /// Build a tracker, seeding the policy state from persisted samples so
    /// a restart does not re-record an unchanged value.
    pub async fn resume(
        client: Arc<C>,
        store: Arc<dyn Store>,
        config: SpaceTrackerConfig,
    ) -> Result<Self, CollectError> {
        let last = store
            .space_samples()
            .await?
            .into_iter()
            .max_by_key(|s| s.timestamp);
        if let Some(sample) = &last {
            tracing::info!(pledged = %sample.pledged, at = sample.timestamp, "space tracker resuming");
        }
        Ok(Self {
            client,
            store,
            last,
            interval: config.interval,
            adjust_interval_secs: config.adjust_interval_secs,
        })
    }

    /// Take one sample and persist it if the policy fires.
    ///
    /// A passed sample becomes the new policy anchor even when its save
    /// fails; the value was observed and the clock should run from it.
    pub async fn tick(&mut self) -> Result<(), CollectError> {
        let fresh = self.client.space_pledged().await?;
        if !should_record(self.last.as_ref(), &fresh, self.adjust_interval_secs) {
            return Ok(());
        }
        if let Err(e) = self.store.save_space_sample(&fresh).await {
            tracing::warn!(error = %e, "save space sample failed");
        } else {
            tracing::info!(pledged = %fresh.pledged, "pledged space recorded");
        }
        self.last = Some(fresh);
        Ok(())
    }

    /// Drive [`tick`](Self::tick) until cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("space tracker stopped");
                    return;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
            if let Err(e) = self.tick().await {
                tracing::warn!(error = %e, "pledged space sample failed");
            }
        }
    }
}

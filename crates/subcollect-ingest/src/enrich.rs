//! Event-detail enrichment.
//!
//! For each event of the just-ingested block whose kind is enrichable, the
//! enricher fetches the event's full detail and persists an
//! [`EventDetailRecord`]:
//!
//! - `Subspace.BlockReward` is processed inline. The block author's SS58
//!   address (when it carries the chain's `st` prefix) is decoded to the
//!   raw public key; the reward address is aliased from the detail's
//!   `block_author` argument; height and parent hash come from the block.
//! - `Subspace.FarmerVote` events go through a bounded worker pool. Their
//!   detail ids get ordinals 3, 5, 7… in event order, assigned before
//!   dispatch so pool completion order cannot reorder them.
//!
//! A single failure is recorded but does not stop sibling events; the
//! caller only learns whether any enrichment failed after all dispatched
//! work has joined. Re-running enrichment for a height is safe because
//! detail saves are idempotent upserts.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use subcollect_client::ChainClient;
use subcollect_core::{
    BlockRecord, CollectError, EventArgs, EventDetailRecord, EventKind, EventRecord, Store,
};
use subcollect_ss58::SUBSPACE_ADDRESS_PREFIX;

/// Human-readable SS58 prefix of Subspace addresses.
const ADDRESS_TEXT_PREFIX: &str = "st";

/// Resolves reward/vote events into enriched detail records.
pub struct Enricher<C> {
    client: Arc<C>,
    store: Arc<dyn Store>,
    /// Maximum in-flight farmer-vote enrichments.
    concurrency: usize,
}

impl<C: ChainClient + 'static> Enricher<C> {
    pub fn new(client: Arc<C>, store: Arc<dyn Store>, concurrency: usize) -> Self {
        Self {
            client,
            store,
            concurrency,
        }
    }

    /// Enrich every reward/vote event of one block.
    ///
    /// Returns the first error encountered, after all sibling work has
    /// completed.
    pub async fn enrich_block(
        &self,
        block: &BlockRecord,
        events: &[EventRecord],
    ) -> Result<(), CollectError> {
        let mut first_error: Option<CollectError> = None;
        let mut vote_jobs = Vec::new();
        let mut vote_ordinal = 0usize;

        for event in events {
            match event.kind() {
                Some(EventKind::FarmerVote) => {
                    vote_jobs.push((
                        event.id.clone(),
                        EventDetailRecord::vote_id(block.height, vote_ordinal),
                    ));
                    vote_ordinal += 1;
                }
                Some(EventKind::BlockReward) => {
                    if let Err(e) = self.enrich_reward(block, &event.id).await {
                        tracing::error!(event_id = %event.id, error = %e, "block reward enrichment failed");
                        first_error.get_or_insert(e);
                    }
                }
                None => {}
            }
        }

        let mut results = stream::iter(vote_jobs)
            .map(|(event_id, detail_id)| {
                let client = Arc::clone(&self.client);
                let store = Arc::clone(&self.store);
                async move { Self::enrich_vote(client, store, event_id, detail_id).await }
            })
            .buffer_unordered(self.concurrency);

        while let Some(result) = results.next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "farmer vote enrichment failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Inline path for the block-reward event (at most one per height).
    async fn enrich_reward(&self, block: &BlockRecord, event_id: &str) -> Result<(), CollectError> {
        let detail = self
            .client
            .event_by_id(event_id)
            .await
            .map_err(|e| enrich_err(event_id, &e))?;
        let args = EventArgs::parse(EventKind::BlockReward, &detail.args)?;
        let reward = args
            .as_reward()
            .ok_or_else(|| enrich_err(event_id, &"reward args for non-reward event"))?;

        let public_key = if block.author.starts_with(ADDRESS_TEXT_PREFIX) {
            subcollect_ss58::decode(&block.author, SUBSPACE_ADDRESS_PREFIX)
                .map(|hex| format!("0x{hex}"))
                .unwrap_or_default()
        } else {
            String::new()
        };

        let record = EventDetailRecord {
            id: EventDetailRecord::reward_id(block.height),
            kind: EventKind::BlockReward,
            height: block.height,
            public_key,
            reward_address: reward.block_author.clone(),
            parent_hash: block.parent_hash.clone(),
        };
        self.store
            .save_event_detail(&record)
            .await
            .map_err(|e| enrich_err(event_id, &e))
    }

    /// Pooled path for one farmer-vote event.
    async fn enrich_vote(
        client: Arc<C>,
        store: Arc<dyn Store>,
        event_id: String,
        detail_id: String,
    ) -> Result<(), CollectError> {
        let detail = client
            .event_by_id(&event_id)
            .await
            .map_err(|e| enrich_err(&event_id, &e))?;
        let args = EventArgs::parse(EventKind::FarmerVote, &detail.args)?;
        let vote = args
            .as_vote()
            .ok_or_else(|| enrich_err(&event_id, &"vote args for non-vote event"))?;

        let record = EventDetailRecord {
            id: detail_id,
            kind: EventKind::FarmerVote,
            height: vote.height,
            public_key: vote.public_key.clone(),
            reward_address: vote.reward_address.clone(),
            parent_hash: vote.parent_hash.clone(),
        };
        store
            .save_event_detail(&record)
            .await
            .map_err(|e| enrich_err(&event_id, &e))
    }
}

fn enrich_err(id: &str, reason: &dyn std::fmt::Display) -> CollectError {
    CollectError::Enrich {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

//! In-memory storage backend.
//!
//! Stores collected records in RAM. Useful for tests and short-lived runs
//! that don't need persistence; all data is lost when the process exits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use subcollect_core::{
    BlockRecord, CollectError, EventDetailRecord, EventKind, EventRecord, ExtrinsicRecord, Height,
    SpaceSample, Store,
};

/// In-memory collector storage.
#[derive(Default)]
pub struct MemoryStore {
    blocks: Mutex<HashMap<String, BlockRecord>>,
    extrinsics: Mutex<HashMap<String, ExtrinsicRecord>>,
    events: Mutex<HashMap<String, EventRecord>>,
    details: Mutex<HashMap<String, EventDetailRecord>>,
    samples: Mutex<Vec<SpaceSample>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.lock().unwrap().len()
    }

    pub fn extrinsic_count(&self) -> usize {
        self.extrinsics.lock().unwrap().len()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// All event-detail records, sorted by id.
    pub fn event_details(&self) -> Vec<EventDetailRecord> {
        let mut out: Vec<_> = self.details.lock().unwrap().values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    pub fn event_detail(&self, id: &str) -> Option<EventDetailRecord> {
        self.details.lock().unwrap().get(id).cloned()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.lock().unwrap().len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn save_block(&self, block: &BlockRecord) -> Result<(), CollectError> {
        self.blocks
            .lock()
            .unwrap()
            .insert(block.id.clone(), block.clone());
        Ok(())
    }

    async fn save_extrinsic(&self, extrinsic: &ExtrinsicRecord) -> Result<(), CollectError> {
        self.extrinsics
            .lock()
            .unwrap()
            .insert(extrinsic.id.clone(), extrinsic.clone());
        Ok(())
    }

    async fn save_event(&self, event: &EventRecord) -> Result<(), CollectError> {
        self.events
            .lock()
            .unwrap()
            .insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn save_event_detail(&self, detail: &EventDetailRecord) -> Result<(), CollectError> {
        self.details
            .lock()
            .unwrap()
            .insert(detail.id.clone(), detail.clone());
        Ok(())
    }

    async fn save_space_sample(&self, sample: &SpaceSample) -> Result<(), CollectError> {
        self.samples.lock().unwrap().push(*sample);
        Ok(())
    }

    async fn recent_extrinsics(&self, limit: u32) -> Result<Vec<ExtrinsicRecord>, CollectError> {
        let mut out: Vec<_> = self.extrinsics.lock().unwrap().values().cloned().collect();
        out.sort_by(|a, b| b.height.cmp(&a.height));
        out.truncate(limit as usize);
        Ok(out)
    }

    async fn events_by_kind(&self, kind: EventKind) -> Result<Vec<EventRecord>, CollectError> {
        let mut out: Vec<_> = self
            .events
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.name == kind.as_str())
            .cloned()
            .collect();
        out.sort_by(|a, b| (a.height, a.index_in_block).cmp(&(b.height, b.index_in_block)));
        Ok(out)
    }

    async fn space_samples(&self) -> Result<Vec<SpaceSample>, CollectError> {
        Ok(self.samples.lock().unwrap().clone())
    }

    async fn block_by_height(&self, height: Height) -> Result<Option<BlockRecord>, CollectError> {
        Ok(self
            .blocks
            .lock()
            .unwrap()
            .values()
            .find(|b| b.height == height)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(height: Height) -> BlockRecord {
        BlockRecord {
            id: format!("{height:010}-aaaaa"),
            height,
            hash: format!("0xhash{height}"),
            parent_hash: format!("0xhash{}", height.saturating_sub(1)),
            author: "st8eJ9cuh4XsHyoqWNWr13o8e9SiqYvX2Yg7cSKVKQy6KeUCN".into(),
            state_root: "0xstate".into(),
            extrinsics_root: "0xext".into(),
            spec_id: "subspace@5".into(),
            timestamp: 1_705_309_919,
            extrinsics_count: 1,
            events_count: 2,
        }
    }

    fn extrinsic(height: Height, idx: u32) -> ExtrinsicRecord {
        ExtrinsicRecord {
            id: format!("{height:010}-{idx:06}-bbbbb"),
            name: "Timestamp.set".into(),
            hash: "0xdead".into(),
            height,
            index_in_block: idx,
            timestamp: 1_705_309_919,
            success: true,
            cursor: String::new(),
        }
    }

    #[tokio::test]
    async fn block_upsert_is_idempotent() {
        let store = MemoryStore::new();
        let b = block(100);
        store.save_block(&b).await.unwrap();
        store.save_block(&b).await.unwrap();
        assert_eq!(store.block_count(), 1);
        assert_eq!(store.block_by_height(100).await.unwrap().unwrap().id, b.id);
    }

    #[tokio::test]
    async fn recent_extrinsics_ordered_by_height_desc() {
        let store = MemoryStore::new();
        for h in [5u64, 9, 7] {
            store.save_extrinsic(&extrinsic(h, 0)).await.unwrap();
        }
        let recent = store.recent_extrinsics(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].height, 9);
        assert_eq!(recent[1].height, 7);
    }

    #[tokio::test]
    async fn events_filterable_by_kind() {
        let store = MemoryStore::new();
        let mk = |id: &str, name: &str, idx: u32| EventRecord {
            id: id.into(),
            name: name.into(),
            phase: "Finalization".into(),
            height: 100,
            block_id: "blk".into(),
            index_in_block: idx,
            extrinsic_index: None,
        };
        store
            .save_event(&mk("a", "Subspace.FarmerVote", 2))
            .await
            .unwrap();
        store
            .save_event(&mk("b", "Balances.Transfer", 1))
            .await
            .unwrap();
        store
            .save_event(&mk("c", "Subspace.FarmerVote", 0))
            .await
            .unwrap();

        let votes = store.events_by_kind(EventKind::FarmerVote).await.unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].id, "c"); // index order
    }

    #[tokio::test]
    async fn samples_append_in_order() {
        let store = MemoryStore::new();
        for ts in [10, 20] {
            store
                .save_space_sample(&SpaceSample {
                    timestamp: ts,
                    pledged: 1,
                })
                .await
                .unwrap();
        }
        let samples = store.space_samples().await.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].timestamp, 20);
    }
}

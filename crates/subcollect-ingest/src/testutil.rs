//! Shared fakes and fixtures for the ingest tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use subcollect_client::{ChainClient, EventDetail};
use subcollect_core::{
    BlockRecord, CollectError, EventDetailRecord, EventKind, EventRecord, ExtrinsicRecord, Height,
    SpaceSample, Store,
};

/// A live author address and its raw key (also used by the ss58 tests).
pub const AUTHOR: &str = "st8eJ9cuh4XsHyoqWNWr13o8e9SiqYvX2Yg7cSKVKQy6KeUCN";

pub fn block_at(height: Height) -> BlockRecord {
    BlockRecord {
        id: format!("{height:010}-aaaaa"),
        height,
        hash: format!("0xhash{height}"),
        parent_hash: format!("0xhash{}", height.saturating_sub(1)),
        author: AUTHOR.into(),
        state_root: "0xstate".into(),
        extrinsics_root: "0xext".into(),
        spec_id: "subspace@5".into(),
        timestamp: 1_705_309_919,
        extrinsics_count: 1,
        events_count: 2,
    }
}

pub fn extrinsic_at(height: Height, idx: u32) -> ExtrinsicRecord {
    ExtrinsicRecord {
        id: format!("{height:010}-{idx:06}-ex"),
        name: "Timestamp.set".into(),
        hash: "0xdead".into(),
        height,
        index_in_block: idx,
        timestamp: 1_705_309_919,
        success: true,
        cursor: format!("{height}-{idx}"),
    }
}

pub fn vote_event(height: Height, idx: u32) -> EventRecord {
    EventRecord {
        id: format!("{height:010}-{idx:06}-fv"),
        name: "Subspace.FarmerVote".into(),
        phase: "Finalization".into(),
        height,
        block_id: format!("{height:010}-aaaaa"),
        index_in_block: idx,
        extrinsic_index: None,
    }
}

pub fn reward_event(height: Height, idx: u32) -> EventRecord {
    EventRecord {
        id: format!("{height:010}-{idx:06}-rw"),
        name: "Subspace.BlockReward".into(),
        phase: "Finalization".into(),
        height,
        block_id: format!("{height:010}-aaaaa"),
        index_in_block: idx,
        extrinsic_index: None,
    }
}

pub fn reward_detail() -> EventDetail {
    EventDetail {
        id: "detail-rw".into(),
        name: "Subspace.BlockReward".into(),
        args: json!([
            {"name": "block_author", "type": "[U8; 32]", "type_name": "AccountId",
             "value": "0x005ed3cb9967d03e49430b302c8fc37540748e161e90fde908083b418759b732"},
            {"name": "reward", "type": "U128", "type_name": "BalanceOf",
             "value": "100000000000000000"}
        ]),
        timestamp: "2024-01-15T09:11:59.180000Z".into(),
    }
}

pub fn vote_detail(voted_height: Height) -> EventDetail {
    EventDetail {
        id: "detail-fv".into(),
        name: "Subspace.FarmerVote".into(),
        args: json!({
            "height": voted_height,
            "publicKey": "0xda57fd931741b19590359c867fa3d122f66e22649e987ecdef1c523654adcf55",
            "rewardAddress": "0x4ecc0ee03bcca0cea9f7f2180bae5964eb80b29d38b6fa010e0fe45ba7e1a264",
            "parentHash": "0xa14e31c39d0869bcfa6032ae45596ca54266d504cccbe99f416231c323a287f0"
        }),
        timestamp: "2024-01-15T09:11:59.180000Z".into(),
    }
}

/// Canned-data `ChainClient` with per-call failure injection.
#[derive(Default)]
pub struct FakeClient {
    blocks: Mutex<HashMap<Height, BlockRecord>>,
    extrinsics: Mutex<HashMap<Height, Vec<ExtrinsicRecord>>>,
    events: Mutex<HashMap<Height, Vec<EventRecord>>>,
    details: Mutex<HashMap<String, EventDetail>>,
    failing_details: Mutex<HashSet<String>>,
    fail_blocks: Mutex<bool>,
    samples: Mutex<VecDeque<SpaceSample>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a full height: block, extrinsics, events.
    pub fn put_height(
        &self,
        block: BlockRecord,
        extrinsics: Vec<ExtrinsicRecord>,
        events: Vec<EventRecord>,
    ) {
        let height = block.height;
        self.blocks.lock().unwrap().insert(height, block);
        self.extrinsics.lock().unwrap().insert(height, extrinsics);
        self.events.lock().unwrap().insert(height, events);
    }

    pub fn put_detail(&self, event_id: &str, detail: EventDetail) {
        self.details
            .lock()
            .unwrap()
            .insert(event_id.to_string(), detail);
    }

    /// Make `event_by_id` fail for this event until cleared.
    pub fn fail_detail(&self, event_id: &str) {
        self.failing_details
            .lock()
            .unwrap()
            .insert(event_id.to_string());
    }

    pub fn clear_detail_failure(&self, event_id: &str) {
        self.failing_details.lock().unwrap().remove(event_id);
    }

    /// Make every block fetch fail with a transport error until cleared.
    pub fn set_block_fetch_failing(&self, failing: bool) {
        *self.fail_blocks.lock().unwrap() = failing;
    }

    pub fn push_sample(&self, sample: SpaceSample) {
        self.samples.lock().unwrap().push_back(sample);
    }
}

#[async_trait]
impl ChainClient for FakeClient {
    async fn block_by_height(&self, height: Height) -> Result<BlockRecord, CollectError> {
        if *self.fail_blocks.lock().unwrap() {
            return Err(CollectError::Transport("injected block failure".into()));
        }
        self.blocks
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .ok_or(CollectError::NotFound { height })
    }

    async fn extrinsics_by_height(
        &self,
        height: Height,
    ) -> Result<Vec<ExtrinsicRecord>, CollectError> {
        Ok(self
            .extrinsics
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .unwrap_or_default())
    }

    async fn events_by_height(&self, height: Height) -> Result<Vec<EventRecord>, CollectError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .unwrap_or_default())
    }

    async fn event_by_id(&self, event_id: &str) -> Result<EventDetail, CollectError> {
        if self.failing_details.lock().unwrap().contains(event_id) {
            return Err(CollectError::Transport("injected detail failure".into()));
        }
        self.details
            .lock()
            .unwrap()
            .get(event_id)
            .cloned()
            .ok_or_else(|| CollectError::Decode(format!("no canned detail for {event_id}")))
    }

    async fn space_pledged(&self) -> Result<SpaceSample, CollectError> {
        self.samples
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CollectError::Transport("no canned sample".into()))
    }
}

/// `Store` wrapper that injects failures for specific record ids.
pub struct FlakyStore<S> {
    pub inner: S,
    fail_block_ids: Mutex<HashSet<String>>,
    fail_extrinsic_ids: Mutex<HashSet<String>>,
    fail_event_ids: Mutex<HashSet<String>>,
}

impl<S: Store> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_block_ids: Mutex::new(HashSet::new()),
            fail_extrinsic_ids: Mutex::new(HashSet::new()),
            fail_event_ids: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_block(&self, id: &str) {
        self.fail_block_ids.lock().unwrap().insert(id.to_string());
    }

    pub fn clear_block_failure(&self, id: &str) {
        self.fail_block_ids.lock().unwrap().remove(id);
    }

    pub fn fail_extrinsic(&self, id: &str) {
        self.fail_extrinsic_ids
            .lock()
            .unwrap()
            .insert(id.to_string());
    }

    pub fn fail_event(&self, id: &str) {
        self.fail_event_ids.lock().unwrap().insert(id.to_string());
    }
}

#[async_trait]
impl<S: Store> Store for FlakyStore<S> {
    async fn save_block(&self, block: &BlockRecord) -> Result<(), CollectError> {
        if self.fail_block_ids.lock().unwrap().contains(&block.id) {
            return Err(CollectError::Storage("injected block save failure".into()));
        }
        self.inner.save_block(block).await
    }

    async fn save_extrinsic(&self, extrinsic: &ExtrinsicRecord) -> Result<(), CollectError> {
        if self
            .fail_extrinsic_ids
            .lock()
            .unwrap()
            .contains(&extrinsic.id)
        {
            return Err(CollectError::Storage(
                "injected extrinsic save failure".into(),
            ));
        }
        self.inner.save_extrinsic(extrinsic).await
    }

    async fn save_event(&self, event: &EventRecord) -> Result<(), CollectError> {
        if self.fail_event_ids.lock().unwrap().contains(&event.id) {
            return Err(CollectError::Storage("injected event save failure".into()));
        }
        self.inner.save_event(event).await
    }

    async fn save_event_detail(&self, detail: &EventDetailRecord) -> Result<(), CollectError> {
        self.inner.save_event_detail(detail).await
    }

    async fn save_space_sample(&self, sample: &SpaceSample) -> Result<(), CollectError> {
        self.inner.save_space_sample(sample).await
    }

    async fn recent_extrinsics(&self, limit: u32) -> Result<Vec<ExtrinsicRecord>, CollectError> {
        self.inner.recent_extrinsics(limit).await
    }

    async fn events_by_kind(&self, kind: EventKind) -> Result<Vec<EventRecord>, CollectError> {
        self.inner.events_by_kind(kind).await
    }

    async fn space_samples(&self) -> Result<Vec<SpaceSample>, CollectError> {
        self.inner.space_samples().await
    }

    async fn block_by_height(&self, height: Height) -> Result<Option<BlockRecord>, CollectError> {
        self.inner.block_by_height(height).await
    }
}

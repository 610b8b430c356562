//! The persistence gateway trait.
//!
//! Implementations live in `subcollect-storage` (memory, SQLite). Every
//! save is an upsert keyed by the record's id, which is what makes the
//! loop's retry-same-height policy safe.

use async_trait::async_trait;

use crate::error::CollectError;
use crate::types::{
    BlockRecord, EventDetailRecord, EventKind, EventRecord, ExtrinsicRecord, Height, SpaceSample,
};

/// Storage backend for collected chain data.
#[async_trait]
pub trait Store: Send + Sync {
    async fn save_block(&self, block: &BlockRecord) -> Result<(), CollectError>;

    async fn save_extrinsic(&self, extrinsic: &ExtrinsicRecord) -> Result<(), CollectError>;

    async fn save_event(&self, event: &EventRecord) -> Result<(), CollectError>;

    async fn save_event_detail(&self, detail: &EventDetailRecord) -> Result<(), CollectError>;

    /// Append a pledged-space sample. Samples have no natural key; the
    /// change-detection policy in the tracker keeps this from growing
    /// unboundedly.
    async fn save_space_sample(&self, sample: &SpaceSample) -> Result<(), CollectError>;

    /// Most recent extrinsics, highest block first. Used to resolve the
    /// start height on restart.
    async fn recent_extrinsics(&self, limit: u32) -> Result<Vec<ExtrinsicRecord>, CollectError>;

    async fn events_by_kind(&self, kind: EventKind) -> Result<Vec<EventRecord>, CollectError>;

    async fn space_samples(&self) -> Result<Vec<SpaceSample>, CollectError>;

    async fn block_by_height(&self, height: Height) -> Result<Option<BlockRecord>, CollectError>;
}

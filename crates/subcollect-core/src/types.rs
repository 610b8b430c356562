//! Shared record types for the collection pipeline.
//!
//! Heights arrive from the squid API as decimal strings; the client parses
//! them at the boundary so everything in here is numeric.

use serde::{Deserialize, Serialize};

/// Sequential block number — the sole ordering key for ingestion.
pub type Height = u64;

// ─── BlockRecord ─────────────────────────────────────────────────────────────

/// A finalized block as persisted by the collector.
///
/// Upserted by `id`, so re-ingesting the same height is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Squid block id (e.g. `"0001107843-614b9"`).
    pub id: String,
    pub height: Height,
    pub hash: String,
    pub parent_hash: String,
    /// SS58 address of the block author (`st…` on Subspace).
    pub author: String,
    pub state_root: String,
    pub extrinsics_root: String,
    /// Runtime spec id (e.g. `"subspace@5"`).
    pub spec_id: String,
    /// Chain time, unix seconds.
    pub timestamp: i64,
    pub extrinsics_count: u32,
    pub events_count: u32,
}

// ─── ExtrinsicRecord ─────────────────────────────────────────────────────────

/// A transaction-like unit included in a block, ordered by `index_in_block`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrinsicRecord {
    pub id: String,
    pub name: String,
    pub hash: String,
    pub height: Height,
    pub index_in_block: u32,
    /// Chain time of the containing block, unix seconds.
    pub timestamp: i64,
    pub success: bool,
    /// Opaque pagination cursor from the squid connection edge.
    pub cursor: String,
}

// ─── EventRecord ─────────────────────────────────────────────────────────────

/// A chain-emitted notification attached to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    /// Fully qualified event name (e.g. `"Subspace.FarmerVote"`).
    pub name: String,
    /// Dispatch phase (`"ApplyExtrinsic"`, `"Finalization"`, …).
    pub phase: String,
    pub height: Height,
    /// Squid id of the containing block.
    pub block_id: String,
    pub index_in_block: u32,
    /// Index of the originating extrinsic, if the event has one.
    pub extrinsic_index: Option<u32>,
}

impl EventRecord {
    /// The known event kind of this record, if it is one the enricher handles.
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_name(&self.name)
    }
}

// ─── EventKind ───────────────────────────────────────────────────────────────

/// The two event kinds that get enriched into [`EventDetailRecord`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    BlockReward,
    FarmerVote,
}

impl EventKind {
    /// Fully qualified on-chain event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockReward => "Subspace.BlockReward",
            Self::FarmerVote => "Subspace.FarmerVote",
        }
    }

    /// Parse a fully qualified event name; `None` for kinds we don't enrich.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Subspace.BlockReward" => Some(Self::BlockReward),
            "Subspace.FarmerVote" => Some(Self::FarmerVote),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── EventDetailRecord ───────────────────────────────────────────────────────

/// Enriched view of a reward/vote event, produced only by the enricher.
///
/// `id` is `"{height}-{ordinal}"`: ordinal 1 for the block reward (at most
/// one per height), 3, 5, 7… for farmer votes in event order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetailRecord {
    pub id: String,
    pub kind: EventKind,
    pub height: Height,
    /// `0x`-prefixed 32-byte public key, when resolvable.
    pub public_key: String,
    pub reward_address: String,
    pub parent_hash: String,
}

impl EventDetailRecord {
    /// Detail id for the block-reward event of `height`.
    pub fn reward_id(height: Height) -> String {
        format!("{height}-1")
    }

    /// Detail id for the `n`-th farmer vote (0-based) of `height`.
    pub fn vote_id(height: Height, n: usize) -> String {
        format!("{}-{}", height, 3 + 2 * n)
    }
}

// ─── SpaceSample ─────────────────────────────────────────────────────────────

/// One pledged-space observation. Timestamp is chain time, not wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSample {
    /// Chain time, unix seconds.
    pub timestamp: i64,
    /// Pledged space reported by the chain, bytes.
    pub pledged: i64,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

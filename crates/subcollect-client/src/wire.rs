//! Wire types for the squid GraphQL API and their conversions into the
//! core record types.
//!
//! Heights and pledged-space values arrive as decimal strings (GraphQL
//! `BigInt`), timestamps as ISO-8601 with fractional seconds. Both are
//! normalized here so nothing downstream touches strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use subcollect_core::{BlockRecord, CollectError, EventRecord, ExtrinsicRecord, SpaceSample};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlRequest {
    pub operation_name: String,
    pub variables: Variables,
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GqlResponse {
    #[serde(default)]
    pub data: GqlData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlData {
    #[serde(default)]
    pub blocks: Vec<BlockNode>,
    #[serde(default)]
    pub events_connection: Option<Connection>,
    #[serde(default)]
    pub extrinsics_connection: Option<Connection>,
    #[serde(default)]
    pub event_by_id: Option<EventDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub state_root: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub extrinsics_root: String,
    #[serde(default)]
    pub spec_id: String,
    #[serde(default)]
    pub parent_hash: String,
    #[serde(default)]
    pub extrinsics_count: u32,
    #[serde(default)]
    pub events_count: u32,
    /// Only present in the home query.
    #[serde(default)]
    pub space_pledged: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub total_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Edge {
    pub node: Node,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// A connection node — the squid uses one shape for both extrinsic and
/// event edges, with kind-specific fields left null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub index_in_block: u32,
    #[serde(default)]
    pub block: NodeBlock,
    // Event-only.
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub extrinsic: Option<NodeExtrinsic>,
    // Extrinsic-only.
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeBlock {
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeExtrinsic {
    #[serde(default)]
    pub index_in_block: u32,
}

/// Raw (pre-enrichment) event detail returned by `EventById`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDetail {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub timestamp: String,
}

// ─── Conversions ─────────────────────────────────────────────────────────────

/// Parse a squid `BigInt` string field.
pub fn parse_height(field: &str, s: &str) -> Result<u64, CollectError> {
    s.parse()
        .map_err(|_| CollectError::Decode(format!("bad {field}: {s:?}")))
}

/// Parse a squid ISO-8601 timestamp (`2024-01-15T09:11:59.180000Z`) into
/// unix seconds, ignoring the fractional part.
pub fn parse_timestamp(s: &str) -> Result<i64, CollectError> {
    let trimmed = s.split('.').next().unwrap_or(s);
    chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .map(|t| t.and_utc().timestamp())
        .map_err(|e| CollectError::Decode(format!("bad timestamp {s:?}: {e}")))
}

impl BlockNode {
    pub fn into_record(self) -> Result<BlockRecord, CollectError> {
        Ok(BlockRecord {
            height: parse_height("block height", &self.height)?,
            timestamp: parse_timestamp(&self.timestamp)?,
            id: self.id,
            hash: self.hash,
            parent_hash: self.parent_hash,
            author: self.author.map(|a| a.id).unwrap_or_default(),
            state_root: self.state_root,
            extrinsics_root: self.extrinsics_root,
            spec_id: self.spec_id,
            extrinsics_count: self.extrinsics_count,
            events_count: self.events_count,
        })
    }

    pub fn into_space_sample(self) -> Result<SpaceSample, CollectError> {
        let pledged = self
            .space_pledged
            .ok_or_else(|| CollectError::Decode("home query row without spacePledged".into()))?;
        Ok(SpaceSample {
            pledged: pledged
                .parse()
                .map_err(|_| CollectError::Decode(format!("bad spacePledged: {pledged:?}")))?,
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}

impl Edge {
    pub fn into_event(self) -> Result<EventRecord, CollectError> {
        let node = self.node;
        Ok(EventRecord {
            height: parse_height("event block height", &node.block.height)?,
            id: node.id,
            name: node.name,
            phase: node.phase.unwrap_or_default(),
            block_id: node.block.id,
            index_in_block: node.index_in_block,
            extrinsic_index: node.extrinsic.map(|e| e.index_in_block),
        })
    }

    pub fn into_extrinsic(self) -> Result<ExtrinsicRecord, CollectError> {
        let node = self.node;
        Ok(ExtrinsicRecord {
            height: parse_height("extrinsic block height", &node.block.height)?,
            timestamp: parse_timestamp(node.block.timestamp.as_deref().unwrap_or_default())?,
            id: node.id,
            name: node.name,
            hash: node.hash.unwrap_or_default(),
            index_in_block: node.index_in_block,
            success: node.success.unwrap_or_default(),
            cursor: self.cursor.unwrap_or_default(),
        })
    }
}

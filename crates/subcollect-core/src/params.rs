//! Typed event parameters for the two enriched event kinds.
//!
//! The indexing API returns detail `args` as a JSON object
//! (`{"height": …, "publicKey": …}`), while the node emits the same data as
//! a positional array of `{name, type, type_name, value}` entries. Both
//! shapes are parsed here, once, into one strongly typed structure per
//! kind. Parameter names we don't know are logged and ignored.

use serde_json::Value;

use crate::error::CollectError;
use crate::types::{EventKind, Height};

/// Arguments of a `Subspace.BlockReward` event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardArgs {
    /// SS58 address of the rewarded block author.
    pub block_author: String,
    /// Reward amount in Shannons (decimal string, exceeds u64).
    pub reward: String,
}

/// Arguments of a `Subspace.FarmerVote` event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteArgs {
    /// `0x`-prefixed farmer public key.
    pub public_key: String,
    pub reward_address: String,
    /// Height the vote is for (the parent of the including block).
    pub height: Height,
    pub parent_hash: String,
}

/// Parsed arguments of an enrichable event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventArgs {
    BlockReward(RewardArgs),
    FarmerVote(VoteArgs),
}

impl EventArgs {
    /// Parse raw `args` JSON for the given event kind.
    ///
    /// Accepts the squid object form and the node's positional array form.
    /// Missing parameters are left at their defaults (the API omits fields
    /// for some runtime versions); a shape that is neither object nor array
    /// is a decode error.
    pub fn parse(kind: EventKind, raw: &Value) -> Result<Self, CollectError> {
        let fields = collect_fields(kind, raw)?;
        Ok(match kind {
            EventKind::BlockReward => {
                let mut args = RewardArgs::default();
                for (name, value) in fields {
                    match name.as_str() {
                        "block_author" | "blockAuthor" => args.block_author = as_string(&value),
                        "reward" => args.reward = as_string(&value),
                        other => ignore_param(kind, other),
                    }
                }
                Self::BlockReward(args)
            }
            EventKind::FarmerVote => {
                let mut args = VoteArgs::default();
                for (name, value) in fields {
                    match name.as_str() {
                        "public_key" | "publicKey" => args.public_key = as_string(&value),
                        "reward_address" | "rewardAddress" => {
                            args.reward_address = as_string(&value)
                        }
                        "parent_hash" | "parentHash" => args.parent_hash = as_string(&value),
                        "height" => args.height = as_height(&value),
                        other => ignore_param(kind, other),
                    }
                }
                Self::FarmerVote(args)
            }
        })
    }

    /// Returns the reward arguments, if this is a block-reward event.
    pub fn as_reward(&self) -> Option<&RewardArgs> {
        match self {
            Self::BlockReward(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the vote arguments, if this is a farmer-vote event.
    pub fn as_vote(&self) -> Option<&VoteArgs> {
        match self {
            Self::FarmerVote(v) => Some(v),
            _ => None,
        }
    }
}

/// Flatten either args shape into `(name, value)` pairs.
fn collect_fields(kind: EventKind, raw: &Value) -> Result<Vec<(String, Value)>, CollectError> {
    match raw {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()),
        Value::Array(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry.get("name").and_then(Value::as_str) {
                    Some(name) => {
                        let value = entry.get("value").cloned().unwrap_or(Value::Null);
                        out.push((name.to_string(), value));
                    }
                    None => {
                        tracing::debug!(%kind, "event parameter entry without a name, ignoring");
                    }
                }
            }
            Ok(out)
        }
        Value::Null => Ok(vec![]),
        other => Err(CollectError::Decode(format!(
            "unexpected {kind} args shape: {other}"
        ))),
    }
}

fn ignore_param(kind: EventKind, name: &str) {
    tracing::debug!(%kind, param = name, "unrecognized event parameter, ignoring");
}

fn as_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn as_height(v: &Value) -> Height {
    match v {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

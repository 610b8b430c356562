//! Error taxonomy for the collection pipeline.
//!
//! Every failure is handled locally inside the loop or tracker that hit it;
//! nothing propagates past the process entry point except start-height
//! resolution. The variants map onto the loop's recovery rules:
//! `NotFound` stretches the polling interval, `Transport`/`Decode` retry the
//! same height next tick, `Storage` of a block record aborts the cycle, and
//! `Enrich` blocks height advancement.

use thiserror::Error;

use crate::types::Height;

/// Errors that can occur while collecting chain data.
#[derive(Debug, Error)]
pub enum CollectError {
    /// HTTP-level failure: connection error or non-success status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The indexing API has no rows for this height yet.
    #[error("block {height} not found")]
    NotFound { height: Height },

    /// Response body did not parse as the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Persistence gateway failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// An event-detail enrichment failed (fetch or save).
    #[error("enrich '{id}' failed: {reason}")]
    Enrich { id: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl CollectError {
    /// Returns `true` if the height simply hasn't been produced yet,
    /// which should lengthen the polling interval rather than hot-loop.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for transient failures worth retrying in place.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for CollectError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

//! The `ChainClient` trait and its `reqwest`-backed squid implementation.

use std::time::Duration;

use async_trait::async_trait;

use subcollect_core::{
    BlockRecord, CollectError, EventRecord, ExtrinsicRecord, Height, SpaceSample,
};

use crate::queries;
use crate::retry::{RetryConfig, RetryPolicy};
use crate::wire::{EventDetail, GqlRequest, GqlResponse, Variables};

/// First-page cap for extrinsic/event connections. Pagination beyond the
/// first page is not implemented; Subspace blocks stay well under this.
const FIRST_PAGE: u32 = 100;

/// Typed access to the indexing API. The ingestion loop and trackers are
/// generic over this so tests can feed them canned data.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Fetch the block at `height`. Fails with [`CollectError::NotFound`]
    /// when the chain has not produced it yet.
    async fn block_by_height(&self, height: Height) -> Result<BlockRecord, CollectError>;

    /// Extrinsics of the block at `height`, ordered by index-in-block.
    async fn extrinsics_by_height(
        &self,
        height: Height,
    ) -> Result<Vec<ExtrinsicRecord>, CollectError>;

    /// Events of the block at `height`, ordered by index-in-block.
    async fn events_by_height(&self, height: Height) -> Result<Vec<EventRecord>, CollectError>;

    /// Raw, pre-enrichment detail for one event.
    async fn event_by_id(&self, event_id: &str) -> Result<EventDetail, CollectError>;

    /// Current pledged-space sample from the chain head.
    async fn space_pledged(&self) -> Result<SpaceSample, CollectError>;
}

/// Configuration for [`SquidClient`].
#[derive(Debug, Clone)]
pub struct SquidClientConfig {
    pub retry: RetryConfig,
    pub request_timeout: Duration,
}

impl Default for SquidClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// GraphQL client for a Subspace squid endpoint.
pub struct SquidClient {
    url: String,
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl SquidClient {
    pub fn new(url: impl Into<String>, config: SquidClientConfig) -> Result<Self, CollectError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CollectError::Transport(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            http,
            retry: RetryPolicy::new(config.retry),
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, CollectError> {
        Self::new(url, SquidClientConfig::default())
    }

    async fn send_once(&self, req: &GqlRequest) -> Result<GqlResponse, CollectError> {
        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| CollectError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CollectError::Transport(format!(
                "status code: {}",
                status.as_u16()
            )));
        }

        resp.json::<GqlResponse>()
            .await
            .map_err(|e| CollectError::Decode(e.to_string()))
    }

    /// Send a query, retrying transient transport errors with backoff.
    async fn send(&self, op: &str, variables: Variables, query: &str) -> Result<GqlResponse, CollectError> {
        let req = GqlRequest {
            operation_name: op.to_string(),
            variables,
            query: query.to_string(),
        };

        let mut attempt = 0u32;
        loop {
            match self.send_once(&req).await {
                Ok(resp) => return Ok(resp),
                Err(e @ CollectError::Transport(_)) => {
                    attempt += 1;
                    match self.retry.next_delay(attempt) {
                        Some(delay) => {
                            tracing::warn!(
                                op,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                "transport error, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(e),
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl ChainClient for SquidClient {
    async fn block_by_height(&self, height: Height) -> Result<BlockRecord, CollectError> {
        let resp = self
            .send(
                queries::OP_BLOCK_BY_ID,
                Variables {
                    block_id: Some(height),
                    ..Default::default()
                },
                queries::BLOCK_QUERY,
            )
            .await?;
        let node = resp
            .data
            .blocks
            .into_iter()
            .next()
            .ok_or(CollectError::NotFound { height })?;
        node.into_record()
    }

    async fn extrinsics_by_height(
        &self,
        height: Height,
    ) -> Result<Vec<ExtrinsicRecord>, CollectError> {
        let resp = self
            .send(
                queries::OP_EXTRINSICS_BY_BLOCK_ID,
                Variables {
                    block_id: Some(height),
                    first: Some(FIRST_PAGE),
                    ..Default::default()
                },
                queries::EXTRINSIC_QUERY,
            )
            .await?;
        resp.data
            .extrinsics_connection
            .unwrap_or_default()
            .edges
            .into_iter()
            .map(|e| e.into_extrinsic())
            .collect()
    }

    async fn events_by_height(&self, height: Height) -> Result<Vec<EventRecord>, CollectError> {
        let resp = self
            .send(
                queries::OP_EVENTS_BY_BLOCK_ID,
                Variables {
                    block_id: Some(height),
                    first: Some(FIRST_PAGE),
                    ..Default::default()
                },
                queries::EVENT_QUERY,
            )
            .await?;
        resp.data
            .events_connection
            .unwrap_or_default()
            .edges
            .into_iter()
            .map(|e| e.into_event())
            .collect()
    }

    async fn event_by_id(&self, event_id: &str) -> Result<EventDetail, CollectError> {
        let resp = self
            .send(
                queries::OP_EVENT_BY_ID,
                Variables {
                    event_id: Some(event_id.to_string()),
                    ..Default::default()
                },
                queries::EVENT_BY_ID_QUERY,
            )
            .await?;
        resp.data
            .event_by_id
            .ok_or_else(|| CollectError::Decode(format!("event {event_id} not in response")))
    }

    async fn space_pledged(&self) -> Result<SpaceSample, CollectError> {
        let resp = self
            .send(
                queries::OP_HOME_QUERY,
                Variables {
                    limit: Some(10),
                    offset: Some(0),
                    ..Default::default()
                },
                queries::HOME_QUERY,
            )
            .await?;
        let node = resp
            .data
            .blocks
            .into_iter()
            .next()
            .ok_or_else(|| CollectError::Decode("home query returned no blocks".into()))?;
        node.into_space_sample()
    }
}

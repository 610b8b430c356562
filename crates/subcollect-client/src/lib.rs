//! subcollect-client — typed access to the Subspace squid indexing API.
//!
//! Every operation is a POST of `{operationName, variables, query}` and a
//! `{data: {…}}` JSON response. The [`ChainClient`] trait is the seam the
//! ingestion loop is written against, so tests can substitute a fake; the
//! [`SquidClient`] is the `reqwest`-backed implementation with a bounded
//! retry policy for transient transport failures.

pub mod client;
pub mod queries;
pub mod retry;
pub mod wire;

pub use client::{ChainClient, SquidClient};
pub use retry::{RetryConfig, RetryPolicy};
pub use wire::EventDetail;

/// Default public squid endpoint for the gemini-3g network.
pub const DEFAULT_ENDPOINT: &str = "https://squid.gemini-3g.subspace.network/graphql";

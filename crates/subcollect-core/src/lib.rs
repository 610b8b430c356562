//! subcollect-core — foundation for the Subspace chain-data collector.
//!
//! # Architecture
//!
//! ```text
//! Collector (subcollect-ingest)
//!     ├── ChainClient      (squid GraphQL queries, subcollect-client)
//!     ├── Enricher         (reward/vote event-detail resolution)
//!     ├── SpaceTracker     (pledged-space sampling)
//!     └── Store backend    (memory / SQLite, subcollect-storage)
//! ```
//!
//! This crate holds what every other crate shares: the record types, the
//! typed event parameters, the error taxonomy, the start-height cursor
//! rule, and the `Store` persistence trait.

pub mod cursor;
pub mod error;
pub mod params;
pub mod store;
pub mod types;

pub use cursor::resolve_start_height;
pub use error::CollectError;
pub use params::{EventArgs, RewardArgs, VoteArgs};
pub use store::Store;
pub use types::{
    BlockRecord, EventDetailRecord, EventKind, EventRecord, ExtrinsicRecord, Height, SpaceSample,
};

//! subcollect-ingest — the collector's moving parts.
//!
//! Two independent periodic tasks run for the process lifetime:
//!
//! - [`Collector`] — the height-anchored ingestion loop. One height per
//!   cycle: fan-out fetch of block/extrinsics/events, persist, enrich,
//!   advance-or-retry. Heights are strictly sequential; a failed cycle is
//!   retried at the same height next tick.
//! - [`SpaceTracker`] — samples the chain's pledged space once a minute and
//!   persists a sample only when the change-detection policy fires.
//!
//! Concurrency is confined to the 3-way fan-out within one height and the
//! bounded enrichment pool, both of which join before loop state is touched,
//! so no locks guard the height counter or the tracker's maximum.

pub mod collector;
pub mod enrich;
pub mod space;

#[cfg(test)]
mod testutil;

pub use collector::{Collector, CollectorConfig};
pub use enrich::Enricher;
pub use space::{should_record, SpaceTracker, SpaceTrackerConfig};

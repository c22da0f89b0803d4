//! # Timeline Module
//!
//! Data model for a recorded game and the read-only store the analysis
//! stages query.
//!
//! - `types` - positions, latency samples, discrete events
//! - `store` - the `PositionStore` trait
//! - `memory` - in-memory implementation
//! - `ingest` - NDJSON reader

pub mod ingest;
pub mod memory;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use ingest::{load_ndjson, read_ndjson, read_ndjson_from, IngestStats, Record};
pub use memory::{InMemoryTimeline, TimelineBuilder};
pub use store::PositionStore;
pub use types::{ActorId, DiscreteEvent, EventKind, LatencySample, Position, Timestamp, Weapon};

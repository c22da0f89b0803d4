//! In-memory timeline backing the `PositionStore` trait.
//!
//! Samples are kept per actor in time-sorted vectors; every lookup is a
//! binary search for the most recent sample at or before the query time.

use std::collections::HashMap;

use super::store::PositionStore;
use super::types::{ActorId, DiscreteEvent, LatencySample, Position, Timestamp};

/// Materialized timeline for one recorded game.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimeline {
    positions: HashMap<ActorId, Vec<(Timestamp, Position)>>,
    latencies: HashMap<ActorId, Vec<(Timestamp, LatencySample)>>,
    events: HashMap<ActorId, Vec<DiscreteEvent>>,
    ticks: Vec<Timestamp>,
    /// Positions older than this (relative to the query) are treated as absent
    max_staleness_ms: Option<i64>,
}

impl InMemoryTimeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::default()
    }

    pub fn actors(&self) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self
            .positions
            .keys()
            .chain(self.events.keys())
            .chain(self.latencies.keys())
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn position_count(&self) -> usize {
        self.positions.values().map(Vec::len).sum()
    }

    pub fn event_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn set_max_staleness(&mut self, max_staleness_ms: Option<i64>) {
        self.max_staleness_ms = max_staleness_ms;
    }
}

/// Most recent sample at or before `ts`.
fn latest_at<T: Copy>(samples: &[(Timestamp, T)], ts: Timestamp) -> Option<(Timestamp, T)> {
    let idx = samples.partition_point(|(t, _)| *t <= ts);
    if idx == 0 {
        None
    } else {
        Some(samples[idx - 1])
    }
}

impl PositionStore for InMemoryTimeline {
    fn position(&self, actor: ActorId, ts: Timestamp) -> Option<Position> {
        let (sample_ts, pos) = latest_at(self.positions.get(&actor)?, ts)?;
        match self.max_staleness_ms {
            Some(limit) if ts - sample_ts > limit => None,
            _ => Some(pos),
        }
    }

    fn latency(&self, actor: ActorId, ts: Timestamp) -> Option<LatencySample> {
        latest_at(self.latencies.get(&actor)?, ts).map(|(_, sample)| sample)
    }

    fn discrete_events(&self, actor: ActorId) -> &[DiscreteEvent] {
        self.events.get(&actor).map(Vec::as_slice).unwrap_or(&[])
    }

    fn ticks(&self, from: Timestamp, to: Timestamp) -> Vec<Timestamp> {
        let start = self.ticks.partition_point(|t| *t < from);
        let end = self.ticks.partition_point(|t| *t < to);
        if start >= end {
            return Vec::new();
        }
        self.ticks[start..end].to_vec()
    }
}

/// Collects samples in arrival order; `build` sorts them by time.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    timeline: InMemoryTimeline,
}

impl TimelineBuilder {
    pub fn position(mut self, actor: ActorId, ts: Timestamp, pos: Position) -> Self {
        self.push_position(actor, ts, pos);
        self
    }

    pub fn latency(mut self, actor: ActorId, ts: Timestamp, latency_ms: u32) -> Self {
        self.push_latency(actor, ts, LatencySample { latency_ms });
        self
    }

    pub fn event(mut self, event: DiscreteEvent) -> Self {
        self.push_event(event);
        self
    }

    pub fn max_staleness(mut self, max_staleness_ms: i64) -> Self {
        self.timeline.max_staleness_ms = Some(max_staleness_ms);
        self
    }

    pub fn push_position(&mut self, actor: ActorId, ts: Timestamp, pos: Position) {
        let stream = self.timeline.positions.entry(actor).or_default();
        stream.push((ts, pos));
        self.timeline.ticks.push(ts);
    }

    pub fn push_latency(&mut self, actor: ActorId, ts: Timestamp, sample: LatencySample) {
        let stream = self.timeline.latencies.entry(actor).or_default();
        stream.push((ts, sample));
        self.timeline.ticks.push(ts);
    }

    pub fn push_event(&mut self, event: DiscreteEvent) {
        self.timeline.ticks.push(event.ts);
        let stream = self.timeline.events.entry(event.actor).or_default();
        stream.push(event);
    }

    pub fn build(mut self) -> InMemoryTimeline {
        // Stable sorts: samples sharing a timestamp keep arrival order, so
        // the last one recorded wins a lookup.
        for samples in self.timeline.positions.values_mut() {
            samples.sort_by_key(|(ts, _)| *ts);
        }
        for samples in self.timeline.latencies.values_mut() {
            samples.sort_by_key(|(ts, _)| *ts);
        }
        for events in self.timeline.events.values_mut() {
            events.sort_by_key(|e| e.ts);
        }
        self.timeline.ticks.sort_unstable();
        self.timeline.ticks.dedup();
        self.timeline
    }
}

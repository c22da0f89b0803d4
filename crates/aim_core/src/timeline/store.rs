use super::types::{ActorId, DiscreteEvent, LatencySample, Position, Timestamp};

/// Read-only view over a fully materialized game timeline.
///
/// Lookups that cannot be resolved return `None`; callers treat that as a
/// gap in the data, never as an error.
pub trait PositionStore {
    /// Position of `actor` as known at `ts`.
    fn position(&self, actor: ActorId, ts: Timestamp) -> Option<Position>;

    /// One-way latency of `actor` as known at `ts`.
    fn latency(&self, actor: ActorId, ts: Timestamp) -> Option<LatencySample>;

    /// All discrete events of `actor`, ordered by timestamp.
    fn discrete_events(&self, actor: ActorId) -> &[DiscreteEvent];

    /// Distinct sample timestamps in `[from, to)`, ascending.
    fn ticks(&self, from: Timestamp, to: Timestamp) -> Vec<Timestamp>;

    /// Fold over the events of `actor` with `from <= ts <= to`, in time order.
    fn query_events<B, F>(
        &self,
        actor: ActorId,
        from: Timestamp,
        to: Timestamp,
        init: B,
        fold: F,
    ) -> B
    where
        Self: Sized,
        F: FnMut(B, &DiscreteEvent) -> B,
    {
        let events = self.discrete_events(actor);
        let start = events.partition_point(|e| e.ts < from);
        let end = events.partition_point(|e| e.ts <= to);
        if start >= end {
            return init;
        }
        events[start..end].iter().fold(init, fold)
    }
}

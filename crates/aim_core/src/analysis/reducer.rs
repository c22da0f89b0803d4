//! # Temporal Reducer
//!
//! Walks every merged episode window at a fixed step (or at each recorded
//! tick) and emits one `DataPoint` per resolvable sample.
//!
//! ## Velocity decomposition
//! With `a`/`t` the attacker/target positions and `ang(t, a)` the angular
//! distance, between the previous sample and this one:
//! ```text
//! attacker_velocity = (ang(t_now, a_prev) - ang(t_now, a_now)) * 1000 / dt
//! target_velocity   = (ang(t_prev, a_now) - ang(t_now, a_now)) * 1000 / dt
//! aim_velocity      = look_angle_delta(a_now, a_prev)          * 1000 / dt
//! ```
//! Holding one actor fixed isolates the share of the change caused by the
//! other one. Positive values mean the aim point is closing on the target.
//!
//! Carried state (previous positions) starts empty for every episode and is
//! overwritten after every sample, including samples that emit nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::accumulator::{DataPoint, EpisodeAccumulator};
use super::time_shift::{shift_for, ShiftMode};
use super::window_merger::{MergedWindow, TimeWindow};
use crate::config::AnalysisConfig;
use crate::geometry;
use crate::timeline::{ActorId, Position, PositionStore, Timestamp};

/// Default fixed sampling step (ms)
pub const DEFAULT_STEP_MS: i64 = 10;

/// Fixed-step episodes needing more samples than this are not reduced
pub const MAX_EPISODE_SAMPLES: i64 = 10_000_000;

/// Sampling resolution of the reduction sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Sampling {
    /// Every `step_ms` from the window start
    FixedStep { step_ms: i64 },
    /// Every recorded timeline tick inside the window
    Native,
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling::FixedStep {
            step_ms: DEFAULT_STEP_MS,
        }
    }
}

/// Positions carried from the previous sample of the current episode.
#[derive(Debug, Clone, Copy, Default)]
struct ReductionState {
    prev_ts: Option<Timestamp>,
    prev_attacker: Option<Position>,
    prev_target: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct TemporalReducer {
    pub attacker: ActorId,
    pub target: ActorId,
    pub shift: ShiftMode,
    pub sampling: Sampling,
}

impl TemporalReducer {
    pub fn new(attacker: ActorId, target: ActorId) -> Self {
        Self {
            attacker,
            target,
            shift: ShiftMode::None,
            sampling: Sampling::default(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            attacker: config.attacker,
            target: config.target,
            shift: config.shift,
            sampling: config.sampling,
        }
    }

    pub fn with_shift(mut self, shift: ShiftMode) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sample timestamps in `[start, end)`, or `None` when the window needs
    /// more than `MAX_EPISODE_SAMPLES` fixed steps.
    fn sample_times<S: PositionStore>(
        &self,
        store: &S,
        window: &TimeWindow,
    ) -> Option<Vec<Timestamp>> {
        match self.sampling {
            Sampling::FixedStep { step_ms } => {
                let step = step_ms.max(1);
                let count = window.duration_ms().max(0) / step;
                if count > MAX_EPISODE_SAMPLES {
                    return None;
                }
                let mut times = Vec::with_capacity(count as usize + 1);
                let mut ts = window.start;
                while ts < window.end {
                    times.push(ts);
                    match ts.checked_add(step) {
                        Some(next) => ts = next,
                        None => break,
                    }
                }
                Some(times)
            }
            Sampling::Native => Some(store.ticks(window.start, window.end)),
        }
    }

    /// Reduce all episodes into a fresh accumulator.
    pub fn reduce<S: PositionStore>(
        &self,
        store: &S,
        windows: &[MergedWindow],
    ) -> EpisodeAccumulator {
        let mut acc = EpisodeAccumulator::new();

        for merged in windows {
            acc.open(merged);
            let mut state = ReductionState::default();
            let mut gaps = 0usize;

            let Some(times) = self.sample_times(store, &merged.window) else {
                warn!(
                    "Episode {} spans {}ms, too long to sample; left empty",
                    merged.anchor,
                    merged.window.duration_ms()
                );
                continue;
            };

            for ts in times {
                let first = acc.points(merged.anchor).is_empty();
                let (next, point) = self.step(store, &state, merged.window.start, ts, first);
                match point {
                    Some(point) => {
                        acc.push(merged.anchor, point);
                    }
                    None => gaps += 1,
                }
                state = next;
            }

            debug!(
                "Reduced episode {}: {} points, {} gaps",
                merged.anchor,
                acc.points(merged.anchor).len(),
                gaps
            );
        }

        acc
    }

    /// Process one sample. Returns the state for the next sample and the
    /// point to emit, if both positions resolved.
    fn step<S: PositionStore>(
        &self,
        store: &S,
        state: &ReductionState,
        window_start: Timestamp,
        ts: Timestamp,
        first: bool,
    ) -> (ReductionState, Option<DataPoint>) {
        let query = shift_for(store, self.attacker, self.target, ts, self.shift);
        let apos = store.position(self.attacker, query.attacker_ts);
        let tpos = store.position(self.target, query.target_ts);

        let next = ReductionState {
            prev_ts: Some(ts),
            prev_attacker: apos,
            prev_target: tpos,
        };

        let (apos, tpos) = match (apos, tpos) {
            (Some(a), Some(t)) => (a, t),
            _ => {
                trace!("Position gap at {}", ts);
                return (next, None);
            }
        };
        let Some(angular_distance) = geometry::checked_angular_distance(&tpos, &apos) else {
            warn!("Degenerate sight line at {}, sample skipped", ts);
            return (next, None);
        };

        let mut point = DataPoint {
            ts: ts.saturating_sub(window_start),
            attacker: apos,
            target: tpos,
            angular_distance,
            target_velocity: 0.0,
            attacker_velocity: 0.0,
            aim_velocity: 0.0,
            angular_size: geometry::angular_size(&tpos, &apos),
        };

        if first {
            return (next, Some(point));
        }

        if let (Some(prev_ts), Some(prev_a), Some(prev_t)) =
            (state.prev_ts, state.prev_attacker, state.prev_target)
        {
            let dt = ts - prev_ts;
            if dt > 0 {
                let scale = 1000.0 / dt as f64;
                let attacker_moved = geometry::checked_angular_distance(&tpos, &prev_a);
                let target_moved = geometry::checked_angular_distance(&prev_t, &apos);
                if let (Some(held_target), Some(held_attacker)) = (attacker_moved, target_moved) {
                    point.attacker_velocity = (held_target - angular_distance) * scale;
                    point.target_velocity = (held_attacker - angular_distance) * scale;
                }
                point.aim_velocity = geometry::look_angle_delta(&apos, &prev_a) * scale;
            }
        }

        (next, Some(point))
    }
}

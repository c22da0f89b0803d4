//! # Candidate Event Filter
//!
//! Picks the attacker's shots that were plausibly aimed at the target.
//!
//! ## Algorithm
//! 1. Walk the attacker's own event stream
//! 2. Keep shots fired with the configured weapon, attacker != target
//! 3. Resolve both positions at the shot's own timestamp
//! 4. Reject degenerate sight lines and angular distance >= threshold
//! 5. Look for a hit on the target within +/- `hit_window_ms`
//!
//! Read-only against the store: running it twice yields the same events.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{AnalysisConfig, FilterThresholds};
use crate::geometry::{self, AngularSize};
use crate::timeline::{ActorId, DiscreteEvent, PositionStore, Timestamp, Weapon};

/// A shot that passed the filter, enriched with geometry and outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualifyingEvent {
    pub attacker: ActorId,
    pub target: ActorId,
    /// The original shot event
    pub event: DiscreteEvent,
    pub is_hit: bool,
    /// Degrees, measured at the shot's true timestamp
    pub angular_distance: f64,
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angular_size: Option<AngularSize>,
}

impl QualifyingEvent {
    pub fn ts(&self) -> Timestamp {
        self.event.ts
    }
}

/// Why a candidate did not qualify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    NotAttackerEvent,
    NotFiring,
    WrongWeapon(Weapon),
    SelfTarget,
    PositionGap,
    Degenerate,
    OffTarget(f64),
}

/// Shot filter for one attacker/target/weapon triple.
#[derive(Debug, Clone)]
pub struct ShotFilter {
    pub attacker: ActorId,
    pub target: ActorId,
    pub weapon: Weapon,
    pub thresholds: FilterThresholds,
}

impl ShotFilter {
    pub fn new(attacker: ActorId, target: ActorId, weapon: Weapon) -> Self {
        Self {
            attacker,
            target,
            weapon,
            thresholds: FilterThresholds::default(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            attacker: config.attacker,
            target: config.target,
            weapon: config.weapon,
            thresholds: config.thresholds,
        }
    }

    /// Classify a single event of the attacker's stream.
    pub fn classify<S: PositionStore>(
        &self,
        store: &S,
        event: &DiscreteEvent,
    ) -> Result<QualifyingEvent, Rejection> {
        if event.actor != self.attacker {
            return Err(Rejection::NotAttackerEvent);
        }
        let gun = event.kind.fired_weapon().ok_or(Rejection::NotFiring)?;
        if gun != self.weapon {
            return Err(Rejection::WrongWeapon(gun));
        }
        if self.attacker == self.target {
            return Err(Rejection::SelfTarget);
        }

        let (apos, tpos) = match (
            store.position(self.attacker, event.ts),
            store.position(self.target, event.ts),
        ) {
            (Some(a), Some(t)) => (a, t),
            _ => return Err(Rejection::PositionGap),
        };

        let distance = geometry::distance(&tpos, &apos);
        if distance < self.thresholds.min_distance {
            return Err(Rejection::Degenerate);
        }
        let angular_distance = geometry::angular_distance(&tpos, &apos);
        if angular_distance.abs() >= self.thresholds.max_angular_distance_deg {
            return Err(Rejection::OffTarget(angular_distance));
        }

        Ok(QualifyingEvent {
            attacker: self.attacker,
            target: self.target,
            event: event.clone(),
            is_hit: self.hit_confirmed(store, event.ts),
            angular_distance,
            distance,
            angular_size: geometry::angular_size(&tpos, &apos),
        })
    }

    /// True if the attacker's stream records a hit on the target near `ts`.
    pub fn hit_confirmed<S: PositionStore>(&self, store: &S, ts: Timestamp) -> bool {
        let window = self.thresholds.hit_window_ms;
        let (from, to) = (ts.saturating_sub(window), ts.saturating_add(window));
        store.query_events(self.attacker, from, to, false, |found, ev| {
            found || ev.kind.is_hit_on(self.target)
        })
    }

    /// All qualifying shots, ordered by timestamp.
    pub fn find_qualifying<S: PositionStore>(&self, store: &S) -> Vec<QualifyingEvent> {
        let mut qualifying: Vec<QualifyingEvent> = store
            .discrete_events(self.attacker)
            .iter()
            .filter_map(|event| match self.classify(store, event) {
                Ok(q) => {
                    debug!(
                        "Qualifying shot at {}: {:.2} deg, distance {:.1}, hit={}",
                        q.ts(),
                        q.angular_distance,
                        q.distance,
                        q.is_hit
                    );
                    Some(q)
                }
                Err(Rejection::NotFiring) => None,
                Err(reason) => {
                    trace!("Rejected event at {}: {:?}", event.ts, reason);
                    None
                }
            })
            .collect();

        qualifying.sort_by_key(|q| q.ts());
        qualifying
    }
}

//! Synthetic timelines shared by the analysis tests.

use super::memory::TimelineBuilder;
use super::types::{ActorId, DiscreteEvent, EventKind, Position, Timestamp, Weapon};

pub const ATTACKER: ActorId = 1;
pub const TARGET: ActorId = 2;

/// Horizontal range between the two fixture actors.
pub const RANGE: f64 = 100.0;

/// Attacker at the origin, yawed `yaw_deg` away from the target.
///
/// The target stands on +Y at eye height, so the angular distance equals
/// `yaw_deg` exactly.
pub fn attacker_at(yaw_deg: f64) -> Position {
    Position::new(0.0, 0.0, 0.0, yaw_deg, 0.0)
}

pub fn target_at(x: f64) -> Position {
    Position::new(x, RANGE, 6.5, 180.0, 0.0)
}

/// Both actors sampled every `step` ms in `[from, to)`, attacker yaw fixed.
pub fn steady_pair(from: Timestamp, to: Timestamp, step: i64, yaw_deg: f64) -> TimelineBuilder {
    let mut builder = TimelineBuilder::default();
    let mut ts = from;
    while ts < to {
        builder.push_position(ATTACKER, ts, attacker_at(yaw_deg));
        builder.push_position(TARGET, ts, target_at(0.0));
        ts += step;
    }
    builder
}

pub fn shot(ts: Timestamp, gun: Weapon) -> DiscreteEvent {
    DiscreteEvent::new(ts, ATTACKER, EventKind::Shot { gun })
}

pub fn hit(ts: Timestamp, victim: ActorId) -> DiscreteEvent {
    let kind = EventKind::Hit {
        victim,
        gun: Some(Weapon::Rifle),
        damage: None,
    };
    DiscreteEvent::new(ts, ATTACKER, kind)
}

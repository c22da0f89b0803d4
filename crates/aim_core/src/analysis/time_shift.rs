//! Latency compensation for position lookups.
//!
//! The server sees each actor's movement one latency late. To approximate
//! what was actually on screen, one side's query time is moved back by that
//! side's own one-way latency at the sample time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::timeline::{ActorId, LatencySample, PositionStore, Timestamp};

/// Which actor's lookups get shifted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShiftMode {
    None,
    Target,
    #[default]
    Attacker,
}

impl fmt::Display for ShiftMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ShiftMode::None => "none",
            ShiftMode::Target => "target",
            ShiftMode::Attacker => "attacker",
        };
        f.write_str(s)
    }
}

impl FromStr for ShiftMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ShiftMode::None),
            "target" => Ok(ShiftMode::Target),
            "attacker" => Ok(ShiftMode::Attacker),
            other => Err(format!(
                "unknown shift mode '{}' (expected attacker | target | none)",
                other
            )),
        }
    }
}

/// Query times for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftedTimestamps {
    pub target_ts: Timestamp,
    pub attacker_ts: Timestamp,
}

/// Shift `ts` by the given latency sample according to `mode`.
///
/// Without a sample both query times stay at `ts`.
pub fn shifted_timestamps(
    sample: Option<LatencySample>,
    ts: Timestamp,
    mode: ShiftMode,
) -> ShiftedTimestamps {
    let unshifted = ShiftedTimestamps {
        target_ts: ts,
        attacker_ts: ts,
    };
    let Some(sample) = sample else {
        return unshifted;
    };
    let shifted = ts - i64::from(sample.latency_ms);
    match mode {
        ShiftMode::None => unshifted,
        ShiftMode::Target => ShiftedTimestamps {
            target_ts: shifted,
            attacker_ts: ts,
        },
        ShiftMode::Attacker => ShiftedTimestamps {
            target_ts: ts,
            attacker_ts: shifted,
        },
    }
}

/// Resolve the latency of the shifted side from the store and shift `ts`.
pub fn shift_for<S: PositionStore>(
    store: &S,
    attacker: ActorId,
    target: ActorId,
    ts: Timestamp,
    mode: ShiftMode,
) -> ShiftedTimestamps {
    let sample = match mode {
        ShiftMode::None => None,
        ShiftMode::Target => store.latency(target, ts),
        ShiftMode::Attacker => store.latency(attacker, ts),
    };
    shifted_timestamps(sample, ts, mode)
}

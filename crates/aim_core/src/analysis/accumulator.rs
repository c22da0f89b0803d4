//! Episode accumulator: the hand-off between reduction and rendering.
//!
//! Episodes are keyed by anchor timestamp. The reducer opens them in time
//! order, so key order and insertion order coincide.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::candidate_filter::QualifyingEvent;
use super::window_merger::{MergedWindow, TimeWindow};
use crate::geometry::AngularSize;
use crate::timeline::{Position, Timestamp};

/// One reduced sample inside an episode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    /// Milliseconds since the episode window start
    pub ts: i64,
    pub attacker: Position,
    pub target: Position,
    /// Degrees
    pub angular_distance: f64,
    /// Angular distance change caused by target motion (deg/s)
    pub target_velocity: f64,
    /// Angular distance change caused by attacker motion (deg/s)
    pub attacker_velocity: f64,
    /// Attacker view turn rate (deg/s)
    pub aim_velocity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angular_size: Option<AngularSize>,
}

impl DataPoint {
    pub fn has_zero_velocity(&self) -> bool {
        self.target_velocity == 0.0 && self.attacker_velocity == 0.0 && self.aim_velocity == 0.0
    }
}

/// A merged engagement episode and its reduced series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub anchor: Timestamp,
    pub window: TimeWindow,
    /// Time-ordered samples
    pub points: Vec<DataPoint>,
    pub events: Vec<QualifyingEvent>,
}

impl Episode {
    pub fn hit_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_hit).count()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EpisodeAccumulator {
    episodes: BTreeMap<Timestamp, Episode>,
}

impl EpisodeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an episode with no samples yet. Re-opening an anchor is a no-op.
    pub fn open(&mut self, merged: &MergedWindow) {
        self.episodes.entry(merged.anchor).or_insert_with(|| Episode {
            anchor: merged.anchor,
            window: merged.window,
            points: Vec::new(),
            events: merged.events.clone(),
        });
    }

    /// Append a sample to an open episode. Returns false for an unknown anchor.
    pub fn push(&mut self, anchor: Timestamp, point: DataPoint) -> bool {
        match self.episodes.get_mut(&anchor) {
            Some(episode) => {
                let last_ts = episode.points.last().map(|last| last.ts);
                debug_assert!(
                    last_ts.map_or(true, |ts| ts <= point.ts),
                    "samples must arrive in time order"
                );
                episode.points.push(point);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, anchor: Timestamp) -> Option<&Episode> {
        self.episodes.get(&anchor)
    }

    pub fn points(&self, anchor: Timestamp) -> &[DataPoint] {
        self.episodes.get(&anchor).map(|e| e.points.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.values()
    }

    pub fn anchors(&self) -> Vec<Timestamp> {
        self.episodes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.episodes.values().map(|e| e.points.len()).sum()
    }

    pub fn into_episodes(self) -> Vec<Episode> {
        self.episodes.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged(anchor: Timestamp) -> MergedWindow {
        MergedWindow {
            anchor,
            window: TimeWindow::around(anchor, 1000, 0),
            events: Vec::new(),
        }
    }

    fn point(ts: i64) -> DataPoint {
        let p = Position::new(0.0, 0.0, 0.0, 0.0, 0.0);
        DataPoint {
            ts,
            attacker: p,
            target: p,
            angular_distance: 0.0,
            target_velocity: 0.0,
            attacker_velocity: 0.0,
            aim_velocity: 0.0,
            angular_size: None,
        }
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = EpisodeAccumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.total_points(), 0);
        assert!(acc.points(5000).is_empty());
    }

    #[test]
    fn test_push_requires_open_episode() {
        let mut acc = EpisodeAccumulator::new();
        assert!(!acc.push(5000, point(0)));

        acc.open(&merged(5000));
        assert!(acc.push(5000, point(0)));
        assert!(acc.push(5000, point(10)));
        assert_eq!(acc.points(5000).len(), 2);
    }

    #[test]
    fn test_reopen_keeps_points() {
        let mut acc = EpisodeAccumulator::new();
        acc.open(&merged(5000));
        acc.push(5000, point(0));
        acc.open(&merged(5000));
        assert_eq!(acc.points(5000).len(), 1);
    }

    #[test]
    fn test_iteration_is_anchor_ordered() {
        let mut acc = EpisodeAccumulator::new();
        acc.open(&merged(2000));
        acc.open(&merged(9000));
        acc.open(&merged(5000));
        assert_eq!(acc.anchors(), vec![2000, 5000, 9000]);
        let anchors: Vec<Timestamp> = acc.into_episodes().iter().map(|e| e.anchor).collect();
        assert_eq!(anchors, vec![2000, 5000, 9000]);
    }
}

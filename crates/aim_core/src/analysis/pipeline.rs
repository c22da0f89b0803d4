//! Filter -> merge -> reduce, as plain value-in/value-out stages.

use serde::Serialize;
use tracing::info;

use super::accumulator::EpisodeAccumulator;
use super::candidate_filter::ShotFilter;
use super::reducer::TemporalReducer;
use super::window_merger::{merge_windows, MergedWindow};
use crate::config::AnalysisConfig;
use crate::timeline::PositionStore;

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub qualifying_events: usize,
    pub hits: usize,
    pub episodes: usize,
    pub data_points: usize,
}

impl AnalysisSummary {
    pub fn of(acc: &EpisodeAccumulator) -> Self {
        Self {
            qualifying_events: acc.iter().map(|e| e.events.len()).sum(),
            hits: acc.iter().map(|e| e.hit_count()).sum(),
            episodes: acc.len(),
            data_points: acc.total_points(),
        }
    }
}

/// Stages 1 and 2: qualifying shots merged into episode windows.
pub fn find_episodes<S: PositionStore>(store: &S, config: &AnalysisConfig) -> Vec<MergedWindow> {
    let qualifying = ShotFilter::from_config(config).find_qualifying(store);
    merge_windows(qualifying, config.window)
}

/// Run the whole analysis. An empty accumulator means nothing qualified.
pub fn analyze<S: PositionStore>(store: &S, config: &AnalysisConfig) -> EpisodeAccumulator {
    let windows = find_episodes(store, config);
    let acc = TemporalReducer::from_config(config).reduce(store, &windows);

    let summary = AnalysisSummary::of(&acc);
    info!(
        "acn {} -> tcn {} ({}): {} qualifying shots ({} hits) in {} episodes, {} data points",
        config.attacker,
        config.target,
        config.weapon,
        summary.qualifying_events,
        summary.hits,
        summary.episodes,
        summary.data_points
    );

    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Sampling, ShiftMode};
    use crate::timeline::fixtures::{self, ATTACKER, TARGET};
    use crate::timeline::{DiscreteEvent, EventKind, TimelineBuilder, Weapon};

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            shift: ShiftMode::None,
            ..AnalysisConfig::new(ATTACKER, TARGET)
        }
    }

    #[test]
    fn test_single_shot_scenario() {
        let store = fixtures::steady_pair(0, 10_000, 10, 12.0)
            .event(fixtures::shot(5000, Weapon::Rifle))
            .build();

        let acc = analyze(&store, &config());
        assert_eq!(acc.len(), 1);
        let episode = acc.get(5000).unwrap();
        assert_eq!(episode.window.start, 4000);
        assert_eq!(episode.window.end, 5000);
        assert_eq!(episode.points.len(), 100);
        assert_eq!(episode.events.len(), 1);
        assert!((episode.events[0].angular_distance - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlapping_shots_single_episode() {
        let store = fixtures::steady_pair(0, 10_000, 10, 12.0)
            .event(fixtures::shot(5000, Weapon::Rifle))
            .event(fixtures::shot(5500, Weapon::Rifle))
            .build();

        let acc = analyze(&store, &config());
        assert_eq!(acc.anchors(), vec![5000]);
        let episode = acc.get(5000).unwrap();
        assert_eq!((episode.window.start, episode.window.end), (4000, 5500));
        assert_eq!(episode.events.len(), 2);
    }

    #[test]
    fn test_off_target_shot_creates_nothing() {
        let store = fixtures::steady_pair(0, 10_000, 10, 35.0)
            .event(fixtures::shot(5000, Weapon::Rifle))
            .build();

        let acc = analyze(&store, &config());
        assert!(acc.is_empty());
        assert_eq!(AnalysisSummary::of(&acc), AnalysisSummary::default());
    }

    #[test]
    fn test_unvalidated_huge_padding_does_not_sample() {
        let store = fixtures::steady_pair(0, 10_000, 10, 3.0)
            .event(fixtures::shot(5000, Weapon::Rifle))
            .build();
        let mut config = config();
        config.window.before_ms = i64::MAX / 2;
        config.window.after_ms = i64::MAX / 2;

        let acc = analyze(&store, &config);
        assert_eq!(acc.anchors(), vec![5000]);
        assert!(acc.points(5000).is_empty());
        assert_eq!(AnalysisSummary::of(&acc).data_points, 0);
    }

    #[test]
    fn test_episodes_are_disjoint() {
        let store = fixtures::steady_pair(0, 30_000, 10, 3.0)
            .event(fixtures::shot(2000, Weapon::Rifle))
            .event(fixtures::shot(2800, Weapon::Rifle))
            .event(fixtures::shot(9000, Weapon::Rifle))
            .event(fixtures::shot(20_000, Weapon::Rifle))
            .event(fixtures::shot(20_400, Weapon::Rifle))
            .build();

        let acc = analyze(&store, &config());
        let episodes = acc.into_episodes();
        assert_eq!(episodes.len(), 3);
        for pair in episodes.windows(2) {
            assert!(pair[0].window.end < pair[1].window.start);
        }
    }

    #[test]
    fn test_event_geometry_uses_true_timestamp_under_shift() {
        let mut builder = TimelineBuilder::default();
        let mut ts = 3000;
        while ts < 6000 {
            let yaw = 20.0 - 0.01 * (ts - 3000) as f64;
            builder.push_position(ATTACKER, ts, fixtures::attacker_at(yaw));
            builder.push_position(TARGET, ts, fixtures::target_at(0.0));
            ts += 10;
        }
        let store = builder
            .latency(ATTACKER, 0, 100)
            .event(fixtures::shot(5000, Weapon::Rifle))
            .build();

        let shifted = AnalysisConfig {
            shift: ShiftMode::Attacker,
            ..config()
        };
        let acc = analyze(&store, &shifted);
        let episode = acc.get(5000).unwrap();

        // Yaw at the shot's own timestamp, not at 5000 - 100
        assert!((episode.events[0].angular_distance - 0.0).abs() < 1e-6);
        // The first sample (4000) looks the attacker up at 3900
        assert!((episode.points[0].angular_distance - 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_native_sampling_config() {
        let store = fixtures::steady_pair(0, 10_000, 50, 4.0)
            .event(fixtures::shot(5000, Weapon::Rifle))
            .event(DiscreteEvent::new(4425, TARGET, EventKind::Spawn))
            .build();
        let native = AnalysisConfig {
            sampling: Sampling::Native,
            ..config()
        };

        let acc = analyze(&store, &native);
        assert_eq!(
            acc.points(5000).len(),
            21,
            "Position ticks every 50ms plus the respawn tick"
        );
    }

    #[test]
    fn test_summary_counts_hits() {
        let store = fixtures::steady_pair(0, 10_000, 10, 2.0)
            .event(fixtures::shot(5000, Weapon::Rifle))
            .event(fixtures::hit(5010, TARGET))
            .event(fixtures::shot(8000, Weapon::Rifle))
            .build();

        let summary = AnalysisSummary::of(&analyze(&store, &config()));
        assert_eq!(summary.qualifying_events, 2);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.episodes, 2);
        assert_eq!(summary.data_points, 200);
    }
}

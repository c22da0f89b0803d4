//! Line chart description of one episode.
//!
//! Four series share the x axis (ms since window start): the angular
//! distance on the left `deg` axis and the three velocity shares on the
//! right `deg/s` axis.

use serde::{Deserialize, Serialize};

use crate::analysis::{DataPoint, Episode};
use crate::timeline::Timestamp;

pub const ANGULAR_DISTANCE_LABEL: &str = "Angular distance";
pub const TARGET_VELOCITY_LABEL: &str = "Target contributed angular vel";
pub const ATTACKER_VELOCITY_LABEL: &str = "Attacker contributed angular vel";
pub const AIM_VELOCITY_LABEL: &str = "Attacker aim angular vel";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AxisId {
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Axis {
    pub id: AxisId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub label: String,
    /// CSS colour
    pub color: String,
    pub axis: AxisId,
    pub data: Vec<f64>,
    pub span_gaps: bool,
}

impl Dataset {
    fn series(
        label: &str,
        color: (u8, u8, u8),
        axis: AxisId,
        points: &[DataPoint],
        value: impl Fn(&DataPoint) -> f64,
    ) -> Self {
        Self {
            label: label.to_string(),
            color: format!("rgb({}, {}, {})", color.0, color.1, color.2),
            axis,
            data: points.iter().map(value).collect(),
            span_gaps: false,
        }
    }
}

/// Shot marker drawn on top of the series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartEvent {
    /// Milliseconds since window start
    pub ts: i64,
    pub is_hit: bool,
    pub angular_distance: f64,
    /// Attacker to target distance at the shot
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSpec {
    pub anchor: Timestamp,
    pub x_title: String,
    pub axes: Vec<Axis>,
    /// X values, one per data point
    pub labels: Vec<i64>,
    pub datasets: Vec<Dataset>,
    pub events: Vec<ChartEvent>,
}

impl ChartSpec {
    pub fn from_episode(episode: &Episode) -> Self {
        let points = &episode.points;
        let datasets = vec![
            Dataset::series(ANGULAR_DISTANCE_LABEL, (244, 226, 133), AxisId::Left, points, |p| {
                p.angular_distance
            }),
            Dataset::series(TARGET_VELOCITY_LABEL, (188, 75, 81), AxisId::Right, points, |p| {
                p.target_velocity
            }),
            Dataset::series(ATTACKER_VELOCITY_LABEL, (91, 142, 125), AxisId::Right, points, |p| {
                p.attacker_velocity
            }),
            Dataset::series(AIM_VELOCITY_LABEL, (140, 179, 105), AxisId::Right, points, |p| {
                p.aim_velocity
            }),
        ];

        let events = episode
            .events
            .iter()
            .map(|e| ChartEvent {
                ts: e.ts().saturating_sub(episode.window.start),
                is_hit: e.is_hit,
                angular_distance: e.angular_distance,
                distance: e.distance,
            })
            .collect();

        Self {
            anchor: episode.anchor,
            x_title: "ms".to_string(),
            axes: vec![
                Axis {
                    id: AxisId::Left,
                    title: "deg".to_string(),
                },
                Axis {
                    id: AxisId::Right,
                    title: "deg/s".to_string(),
                },
            ],
            labels: points.iter().map(|p| p.ts).collect(),
            datasets,
            events,
        }
    }

    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}

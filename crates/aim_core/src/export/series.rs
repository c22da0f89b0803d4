//! Flat CSV export, one row per data point.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{EpisodeKey, EpisodeRenderer};
use crate::analysis::{DataPoint, Episode};
use crate::error::{AimError, Result};

#[derive(Debug, Serialize)]
struct SeriesRow {
    ts: i64,
    angular_distance: f64,
    target_velocity: f64,
    attacker_velocity: f64,
    aim_velocity: f64,
    attacker_x: f64,
    attacker_y: f64,
    attacker_z: f64,
    attacker_yaw: f64,
    attacker_pitch: f64,
    target_x: f64,
    target_y: f64,
    target_z: f64,
    angular_width: Option<f64>,
    angular_height: Option<f64>,
}

impl From<&DataPoint> for SeriesRow {
    fn from(p: &DataPoint) -> Self {
        Self {
            ts: p.ts,
            angular_distance: p.angular_distance,
            target_velocity: p.target_velocity,
            attacker_velocity: p.attacker_velocity,
            aim_velocity: p.aim_velocity,
            attacker_x: p.attacker.x,
            attacker_y: p.attacker.y,
            attacker_z: p.attacker.z,
            attacker_yaw: p.attacker.yaw,
            attacker_pitch: p.attacker.pitch,
            target_x: p.target.x,
            target_y: p.target.y,
            target_z: p.target.z,
            angular_width: p.angular_size.map(|s| s.width),
            angular_height: p.angular_size.map(|s| s.height),
        }
    }
}

/// Writes `<stem>.csv` series files into a directory.
#[derive(Debug, Clone)]
pub struct CsvSeriesWriter {
    dir: PathBuf,
}

impl CsvSeriesWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &EpisodeKey) -> PathBuf {
        self.dir.join(format!("{}.csv", key.file_stem()))
    }
}

impl EpisodeRenderer for CsvSeriesWriter {
    fn render(&self, key: &EpisodeKey, episode: &Episode) -> Result<PathBuf> {
        let path = self.path_for(key);
        let mut writer = csv::Writer::from_path(&path)?;
        for point in &episode.points {
            writer.serialize(SeriesRow::from(point))?;
        }
        writer
            .flush()
            .map_err(|e| AimError::Export(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, ShiftMode};
    use crate::config::AnalysisConfig;
    use crate::export::render_all;
    use crate::timeline::fixtures::{self, ATTACKER, TARGET};
    use crate::timeline::Weapon;

    #[test]
    fn test_csv_rows_match_points() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            weapon: Weapon::Rl,
            shift: ShiftMode::None,
            ..AnalysisConfig::new(ATTACKER, TARGET)
        };
        let store = fixtures::steady_pair(0, 10_000, 10, 6.0)
            .event(fixtures::shot(5000, Weapon::Rl))
            .build();
        let acc = analyze(&store, &config);

        let written = render_all(&CsvSeriesWriter::new(dir.path()), &config, &acc).unwrap();
        assert_eq!(written, vec![dir.path().join("RL-acn_1-tcn_2-ts_5000.csv")]);

        let mut reader = csv::Reader::from_path(&written[0]).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "ts");
        assert_eq!(&headers[1], "angular_distance");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 100);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[99][0], "990");
        let dist: f64 = rows[10][1].parse().unwrap();
        assert!((dist - 6.0).abs() < 1e-6);
    }
}

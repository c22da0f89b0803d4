//! # Export Module
//!
//! Renders reduced episodes to files. One file per non-empty episode, named
//! deterministically from the analysis parameters and the episode anchor.
//!
//! - `chart` - line chart description (series, axes, colours)
//! - `json` - chart documents as JSON
//! - `series` - raw data points as CSV

pub mod chart;
pub mod json;
pub mod series;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::analysis::{Episode, EpisodeAccumulator};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::timeline::{ActorId, Timestamp, Weapon};

pub use chart::{Axis, AxisId, ChartEvent, ChartSpec, Dataset};
pub use json::{load_chart_document, ChartDocument, JsonChartWriter};
pub use series::CsvSeriesWriter;

/// Identifies one rendered episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeKey {
    pub weapon: Weapon,
    pub attacker: ActorId,
    pub target: ActorId,
    pub anchor: Timestamp,
}

impl EpisodeKey {
    pub fn new(config: &AnalysisConfig, anchor: Timestamp) -> Self {
        Self {
            weapon: config.weapon,
            attacker: config.attacker,
            target: config.target,
            anchor,
        }
    }

    pub fn file_stem(&self) -> String {
        episode_file_stem(self.weapon, self.attacker, self.target, self.anchor)
    }
}

/// `{gun}-acn_{acn}-tcn_{tcn}-ts_{anchor}`
pub fn episode_file_stem(
    weapon: Weapon,
    attacker: ActorId,
    target: ActorId,
    anchor: Timestamp,
) -> String {
    format!("{}-acn_{}-tcn_{}-ts_{}", weapon, attacker, target, anchor)
}

/// Output file format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}' (expected json or csv)", other)),
        }
    }
}

/// Consumer of reduced episodes.
pub trait EpisodeRenderer {
    /// Render one episode, returning the written file.
    fn render(&self, key: &EpisodeKey, episode: &Episode) -> Result<PathBuf>;
}

/// Writer for `format`, creating `dir` if it does not exist.
pub fn renderer_for<P: AsRef<Path>>(
    format: OutputFormat,
    dir: P,
) -> Result<Box<dyn EpisodeRenderer>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    Ok(match format {
        OutputFormat::Json => Box::new(JsonChartWriter::new(dir)),
        OutputFormat::Csv => Box::new(CsvSeriesWriter::new(dir)),
    })
}

/// Render every episode that has data points. Returns the written files.
///
/// An empty accumulator renders nothing.
pub fn render_all<R: EpisodeRenderer + ?Sized>(
    renderer: &R,
    config: &AnalysisConfig,
    acc: &EpisodeAccumulator,
) -> Result<Vec<PathBuf>> {
    if acc.is_empty() {
        info!("No qualifying episodes, nothing to render");
        return Ok(Vec::new());
    }

    let mut written = Vec::with_capacity(acc.len());
    for episode in acc.iter() {
        if episode.points.is_empty() {
            debug!("Episode {} has no samples, skipped", episode.anchor);
            continue;
        }
        let key = EpisodeKey::new(config, episode.anchor);
        let path = renderer.render(&key, episode)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }

    info!("Rendered {} of {} episodes", written.len(), acc.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, ShiftMode};
    use crate::error::AimError;
    use crate::timeline::fixtures::{self, ATTACKER, TARGET};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        keys: RefCell<Vec<EpisodeKey>>,
    }

    impl EpisodeRenderer for Recorder {
        fn render(&self, key: &EpisodeKey, _episode: &Episode) -> Result<PathBuf> {
            self.keys.borrow_mut().push(*key);
            Ok(PathBuf::from(key.file_stem()))
        }
    }

    struct Failing;

    impl EpisodeRenderer for Failing {
        fn render(&self, _key: &EpisodeKey, _episode: &Episode) -> Result<PathBuf> {
            Err(AimError::Export("disk full".to_string()))
        }
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            shift: ShiftMode::None,
            ..AnalysisConfig::new(ATTACKER, TARGET)
        }
    }

    #[test]
    fn test_file_stem_format() {
        assert_eq!(
            episode_file_stem(Weapon::Rifle, 3, 7, 5000),
            "RIFLE-acn_3-tcn_7-ts_5000"
        );
        let key = EpisodeKey::new(&AnalysisConfig::new(1, 2), -250);
        assert_eq!(key.file_stem(), "RIFLE-acn_1-tcn_2-ts_-250");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("png".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_render_all_empty_accumulator() {
        let recorder = Recorder::default();
        let written = render_all(&recorder, &config(), &EpisodeAccumulator::new()).unwrap();
        assert!(written.is_empty());
        assert!(recorder.keys.borrow().is_empty());
    }

    #[test]
    fn test_render_all_in_anchor_order() {
        let store = fixtures::steady_pair(0, 20_000, 10, 4.0)
            .event(fixtures::shot(12_000, Weapon::Rifle))
            .event(fixtures::shot(3000, Weapon::Rifle))
            .build();
        let acc = analyze(&store, &config());

        let recorder = Recorder::default();
        let written = render_all(&recorder, &config(), &acc).unwrap();
        assert_eq!(
            written,
            vec![
                PathBuf::from("RIFLE-acn_1-tcn_2-ts_3000"),
                PathBuf::from("RIFLE-acn_1-tcn_2-ts_12000"),
            ]
        );
    }

    #[test]
    fn test_render_all_skips_empty_episodes() {
        // The shot resolves but the lookback window before it has no samples
        let store = crate::timeline::InMemoryTimeline::builder()
            .position(ATTACKER, 5000, fixtures::attacker_at(2.0))
            .position(TARGET, 5000, fixtures::target_at(0.0))
            .event(fixtures::shot(5000, Weapon::Rifle))
            .build();
        let acc = analyze(&store, &config());
        assert_eq!(acc.len(), 1);

        let recorder = Recorder::default();
        let written = render_all(&recorder, &config(), &acc).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_render_error_propagates() {
        let store = fixtures::steady_pair(0, 10_000, 10, 4.0)
            .event(fixtures::shot(5000, Weapon::Rifle))
            .build();
        let acc = analyze(&store, &config());
        let err = render_all(&Failing, &config(), &acc).unwrap_err();
        assert!(err.is_recoverable());
    }
}

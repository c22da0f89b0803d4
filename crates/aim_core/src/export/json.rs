use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::chart::ChartSpec;
use super::{EpisodeKey, EpisodeRenderer};
use crate::analysis::Episode;
use crate::error::Result;
use crate::timeline::{ActorId, Weapon};

/// Chart spec plus the parameters that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartDocument {
    pub weapon: Weapon,
    pub attacker: ActorId,
    pub target: ActorId,
    pub generated_at: DateTime<Utc>,
    pub chart: ChartSpec,
}

/// Writes `<stem>.json` chart documents into a directory.
#[derive(Debug, Clone)]
pub struct JsonChartWriter {
    dir: PathBuf,
}

impl JsonChartWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &EpisodeKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.file_stem()))
    }
}

impl EpisodeRenderer for JsonChartWriter {
    fn render(&self, key: &EpisodeKey, episode: &Episode) -> Result<PathBuf> {
        let doc = ChartDocument {
            weapon: key.weapon,
            attacker: key.attacker,
            target: key.target,
            generated_at: Utc::now(),
            chart: ChartSpec::from_episode(episode),
        };
        let path = self.path_for(key);
        fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        Ok(path)
    }
}

/// Read back a document written by `JsonChartWriter`.
pub fn load_chart_document<P: AsRef<Path>>(path: P) -> Result<ChartDocument> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

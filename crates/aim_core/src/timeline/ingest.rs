//! NDJSON ingestion
//!
//! One JSON object per line, tagged by `type`:
//!
//! ```text
//! {"type":"position","cn":1,"ts":4000,"x":0.0,"y":0.0,"z":0.0,"yaw":12.0,"pitch":0.0}
//! {"type":"latency","cn":1,"ts":4000,"latency_ms":40}
//! {"type":"shot","cn":1,"ts":5000,"gun":"RIFLE"}
//! {"type":"hit","cn":1,"ts":5020,"victim":2,"gun":"RIFLE","damage":30}
//! ```
//!
//! Unknown record types are skipped. A line that does not parse aborts the
//! whole ingestion.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use super::memory::{InMemoryTimeline, TimelineBuilder};
use super::types::{ActorId, DiscreteEvent, EventKind, LatencySample, Position, Timestamp, Weapon};
use crate::error::{AimError, Result};

/// One line of the recorded stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Position {
        cn: ActorId,
        ts: Timestamp,
        x: f64,
        y: f64,
        z: f64,
        yaw: f64,
        pitch: f64,
    },
    Latency {
        cn: ActorId,
        ts: Timestamp,
        latency_ms: u32,
    },
    Shot {
        cn: ActorId,
        ts: Timestamp,
        gun: Weapon,
    },
    Hit {
        cn: ActorId,
        ts: Timestamp,
        victim: ActorId,
        #[serde(default)]
        gun: Option<Weapon>,
        #[serde(default)]
        damage: Option<f64>,
    },
    Kill {
        cn: ActorId,
        ts: Timestamp,
        victim: ActorId,
    },
    Spawn {
        cn: ActorId,
        ts: Timestamp,
    },
    #[serde(other)]
    Unknown,
}

/// Parse counters reported after ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub lines: usize,
    pub positions: usize,
    pub latencies: usize,
    pub events: usize,
    pub skipped: usize,
}

fn validate_position(line: usize, pos: &Position) -> Result<()> {
    let finite = [pos.x, pos.y, pos.z, pos.yaw, pos.pitch].iter().all(|v| v.is_finite());
    if !finite {
        return Err(AimError::ingest(line, "position contains a non-finite value"));
    }
    if !(-90.0..=90.0).contains(&pos.pitch) {
        return Err(AimError::ingest(
            line,
            format!("pitch {} outside [-90, 90]", pos.pitch),
        ));
    }
    Ok(())
}

fn apply_record(
    builder: &mut TimelineBuilder,
    stats: &mut IngestStats,
    line: usize,
    record: Record,
) -> Result<()> {
    match record {
        Record::Position {
            cn,
            ts,
            x,
            y,
            z,
            yaw,
            pitch,
        } => {
            let pos = Position::new(x, y, z, yaw, pitch);
            validate_position(line, &pos)?;
            builder.push_position(cn, ts, pos);
            stats.positions += 1;
        }
        Record::Latency { cn, ts, latency_ms } => {
            builder.push_latency(cn, ts, LatencySample { latency_ms });
            stats.latencies += 1;
        }
        Record::Shot { cn, ts, gun } => {
            builder.push_event(DiscreteEvent::new(ts, cn, EventKind::Shot { gun }));
            stats.events += 1;
        }
        Record::Hit {
            cn,
            ts,
            victim,
            gun,
            damage,
        } => {
            let kind = EventKind::Hit {
                victim,
                gun,
                damage,
            };
            builder.push_event(DiscreteEvent::new(ts, cn, kind));
            stats.events += 1;
        }
        Record::Kill { cn, ts, victim } => {
            builder.push_event(DiscreteEvent::new(ts, cn, EventKind::Kill { victim }));
            stats.events += 1;
        }
        Record::Spawn { cn, ts } => {
            builder.push_event(DiscreteEvent::new(ts, cn, EventKind::Spawn));
            stats.events += 1;
        }
        Record::Unknown => {
            stats.skipped += 1;
        }
    }
    Ok(())
}

/// Read a complete NDJSON stream into a timeline.
pub fn read_ndjson<R: BufRead>(reader: R) -> Result<(InMemoryTimeline, IngestStats)> {
    let mut builder = InMemoryTimeline::builder();
    let mut stats = IngestStats::default();

    for (idx, raw) in reader.split(b'\n').enumerate() {
        let line_no = idx + 1;
        let raw = raw?;
        let line = std::str::from_utf8(&raw)
            .map_err(|e| AimError::ingest(line_no, format!("invalid UTF-8: {}", e)))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.lines += 1;

        let record: Record = serde_json::from_str(trimmed)
            .map_err(|e| AimError::ingest(line_no, e.to_string()))?;
        apply_record(&mut builder, &mut stats, line_no, record)?;
    }

    if stats.skipped > 0 {
        warn!("Skipped {} records of unknown type", stats.skipped);
    }
    debug!(
        "Ingested {} lines: {} positions, {} latency samples, {} events",
        stats.lines, stats.positions, stats.latencies, stats.events
    );

    Ok((builder.build(), stats))
}

/// Read NDJSON from any byte source.
pub fn read_ndjson_from<R: Read>(source: R) -> Result<(InMemoryTimeline, IngestStats)> {
    read_ndjson(BufReader::new(source))
}

/// Load an NDJSON recording from disk.
pub fn load_ndjson<P: AsRef<Path>>(path: P) -> Result<(InMemoryTimeline, IngestStats)> {
    let file = File::open(path)?;
    read_ndjson_from(file)
}

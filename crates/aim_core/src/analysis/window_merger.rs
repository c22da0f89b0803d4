//! # Window Merger
//!
//! Turns qualifying shots into disjoint episodes.
//!
//! Each shot at `ts` induces `[ts - before, ts + after]`. Windows are swept
//! left to right; a window whose start is at or before the current end
//! (sharing at least one instant) extends the current episode, otherwise it
//! opens a new one. The episode key is its earliest shot's timestamp.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::candidate_filter::QualifyingEvent;
use crate::config::WindowConfig;
use crate::timeline::Timestamp;

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Window padded around an event timestamp.
    pub fn around(ts: Timestamp, before: i64, after: i64) -> Self {
        Self {
            start: ts.saturating_sub(before),
            end: ts.saturating_add(after),
        }
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        other.start <= self.end && self.start <= other.end
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }

    pub fn duration_ms(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

/// One merged episode window with the shots that formed it.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedWindow {
    /// Timestamp of the earliest contributing shot
    pub anchor: Timestamp,
    pub window: TimeWindow,
    /// Contributing shots in time order
    pub events: Vec<QualifyingEvent>,
}

/// Left-to-right sweep over start-sorted windows.
fn sweep<T>(items: Vec<(TimeWindow, T)>) -> Vec<(TimeWindow, Vec<T>)> {
    let mut merged: Vec<(TimeWindow, Vec<T>)> = Vec::new();

    for (window, item) in items {
        match merged.last_mut() {
            Some((current, members)) if window.start <= current.end => {
                current.end = current.end.max(window.end);
                members.push(item);
            }
            _ => merged.push((window, vec![item])),
        }
    }

    merged
}

/// Merge the windows induced by qualifying shots into disjoint episodes.
///
/// Input is sorted by timestamp first, so callers may pass events in any order.
pub fn merge_windows(mut events: Vec<QualifyingEvent>, padding: WindowConfig) -> Vec<MergedWindow> {
    events.sort_by_key(|e| e.ts());

    let items = events
        .into_iter()
        .map(|e| (TimeWindow::around(e.ts(), padding.before_ms, padding.after_ms), e))
        .collect();

    let merged: Vec<MergedWindow> = sweep(items)
        .into_iter()
        .map(|(window, events)| MergedWindow {
            anchor: events[0].ts(),
            window,
            events,
        })
        .collect();

    for m in &merged {
        debug!(
            "Episode {}: [{}, {}] from {} shot(s)",
            m.anchor,
            m.window.start,
            m.window.end,
            m.events.len()
        );
    }

    merged
}

/// Merge bare windows. Merging an already merged set returns it unchanged.
pub fn merge_spans(windows: &[TimeWindow]) -> Vec<TimeWindow> {
    let mut sorted = windows.to_vec();
    sorted.sort_by_key(|w| (w.start, w.end));
    sweep(sorted.into_iter().map(|w| (w, ())).collect())
        .into_iter()
        .map(|(w, _)| w)
        .collect()
}

//! # Analysis Module
//!
//! Episode reconstruction and aim geometry reduction.
//!
//! ## Stages
//!
//! - `candidate_filter` - qualifying shots (weapon, target, angular threshold, hit outcome)
//! - `window_merger` - padded shot windows merged into disjoint episodes
//! - `reducer` - fixed-step walk with carried state, velocity decomposition
//! - `accumulator` - episode anchor -> data points + qualifying shots
//! - `time_shift` - latency compensation for position lookups
//! - `pipeline` - the stages composed

pub mod accumulator;
pub mod candidate_filter;
pub mod pipeline;
pub mod reducer;
pub mod time_shift;
pub mod window_merger;

pub use accumulator::{DataPoint, Episode, EpisodeAccumulator};
pub use candidate_filter::{QualifyingEvent, Rejection, ShotFilter};
pub use pipeline::{analyze, find_episodes, AnalysisSummary};
pub use reducer::{Sampling, TemporalReducer, DEFAULT_STEP_MS};
pub use time_shift::{shift_for, shifted_timestamps, ShiftMode, ShiftedTimestamps};
pub use window_merger::{merge_spans, merge_windows, MergedWindow, TimeWindow};

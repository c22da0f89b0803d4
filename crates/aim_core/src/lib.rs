//! # aim_core - Engagement Episode Reconstruction and Aim Analysis
//!
//! Reconstructs short engagement episodes between an attacker and a target
//! from a recorded match timeline and reduces each episode into a time
//! series of aim geometry.
//!
//! ## Features
//! - Candidate shot filtering by weapon, target and angular distance
//! - Disjoint episode windows merged from padded shot windows
//! - Fixed-step or native-tick reduction with latency compensation
//! - Velocity decomposition into target, attacker and aim contributions
//! - JSON chart and CSV series export
//!
//! ## Example
//! ```rust
//! use aim_core::{analyze, AnalysisConfig, InMemoryTimeline, Position};
//! use aim_core::timeline::{DiscreteEvent, EventKind, Weapon};
//!
//! let mut builder = InMemoryTimeline::builder();
//! for ts in (0..6000).step_by(10) {
//!     builder.push_position(1, ts, Position::new(0.0, 0.0, 0.0, 5.0, 0.0));
//!     builder.push_position(2, ts, Position::new(0.0, 100.0, 6.5, 180.0, 0.0));
//! }
//! builder.push_event(DiscreteEvent::new(5000, 1, EventKind::Shot { gun: Weapon::Rifle }));
//!
//! let episodes = analyze(&builder.build(), &AnalysisConfig::new(1, 2));
//! assert_eq!(episodes.anchors(), vec![5000]);
//! assert_eq!(episodes.points(5000).len(), 100);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod timeline;

pub use analysis::{
    analyze, find_episodes, AnalysisSummary, DataPoint, Episode, EpisodeAccumulator,
};
pub use config::AnalysisConfig;
pub use error::{AimError, Result};
pub use export::{render_all, renderer_for, EpisodeRenderer, OutputFormat};
pub use timeline::{load_ndjson, InMemoryTimeline, Position, PositionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

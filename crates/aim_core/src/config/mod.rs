//! # Analysis Configuration
//!
//! Every tunable of the episode analysis in one serde-friendly struct.
//!
//! ## Usage
//! ```rust
//! use aim_core::config::AnalysisConfig;
//!
//! // Fixed 10ms sampling, 1000ms lookback, attacker-side latency shift
//! let config = AnalysisConfig::new(1, 2);
//!
//! // Single-sample variant at native timeline resolution
//! let native = AnalysisConfig::native(1, 2);
//! # assert!(config.validate().is_ok() && native.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `AIM_SHIFT`: `attacker`, `target` or `none`
//! - `AIM_STEP_MS`: fixed sampling step in milliseconds
//! - `AIM_SAMPLING`: `native` or `fixed`

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::analysis::reducer::{Sampling, DEFAULT_STEP_MS};
use crate::analysis::time_shift::ShiftMode;
use crate::error::{AimError, Result};
use crate::geometry::MIN_DISTANCE;
use crate::timeline::{ActorId, Weapon};

/// Default lookback before each qualifying shot (ms)
pub const DEFAULT_BEFORE_MS: i64 = 1000;

/// Default lookahead after each qualifying shot (ms)
pub const DEFAULT_AFTER_MS: i64 = 0;

/// Upper bound on either window padding (ten minutes)
pub const MAX_PADDING_MS: i64 = 600_000;

/// Shots aimed this far off target or more never qualify (degrees)
pub const DEFAULT_MAX_ANGULAR_DISTANCE_DEG: f64 = 30.0;

/// Half-width of the hit confirmation window around a shot (ms)
pub const DEFAULT_HIT_WINDOW_MS: i64 = 50;

/// Top-level analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Actor whose shots are analysed
    pub attacker: ActorId,
    /// Actor being aimed at
    pub target: ActorId,
    /// Only shots with this weapon qualify
    pub weapon: Weapon,
    /// Episode padding around each qualifying shot
    pub window: WindowConfig,
    /// Latency compensation applied to reducer lookups
    pub shift: ShiftMode,
    /// Reducer sampling resolution
    pub sampling: Sampling,
    /// Candidate filter thresholds
    pub thresholds: FilterThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            attacker: 0,
            target: 0,
            weapon: Weapon::Rifle,
            window: WindowConfig::default(),
            shift: ShiftMode::Attacker,
            sampling: Sampling::default(),
            thresholds: FilterThresholds::default(),
        }
    }
}

/// Window padding around each qualifying event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WindowConfig {
    pub before_ms: i64,
    pub after_ms: i64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            before_ms: DEFAULT_BEFORE_MS,
            after_ms: DEFAULT_AFTER_MS,
        }
    }
}

/// Candidate event filter thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterThresholds {
    /// Exclusive upper bound on the shot's angular distance (degrees)
    pub max_angular_distance_deg: f64,
    /// Hit events within +/- this many ms of the shot count as its outcome
    pub hit_window_ms: i64,
    /// Shots with a shorter sight line are rejected
    pub min_distance: f64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            max_angular_distance_deg: DEFAULT_MAX_ANGULAR_DISTANCE_DEG,
            hit_window_ms: DEFAULT_HIT_WINDOW_MS,
            min_distance: MIN_DISTANCE,
        }
    }
}

impl AnalysisConfig {
    pub fn new(attacker: ActorId, target: ActorId) -> Self {
        Self {
            attacker,
            target,
            ..Self::default()
        }
    }

    /// One sample per recorded tick instead of a fixed step
    pub fn native(attacker: ActorId, target: ActorId) -> Self {
        Self {
            attacker,
            target,
            sampling: Sampling::Native,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from `.yaml`/`.yml` or JSON (any other extension).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            Self::from_yaml_str(&data)?
        } else {
            Self::from_json_str(&data)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply `AIM_*` environment overrides
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Apply `AIM_*` overrides read through `lookup` instead of the process
    /// environment.
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(shift) = lookup("AIM_SHIFT") {
            self.shift = shift.parse().map_err(AimError::InvalidConfig)?;
        }
        if let Some(sampling) = lookup("AIM_SAMPLING") {
            match sampling.to_lowercase().as_str() {
                "native" => self.sampling = Sampling::Native,
                "fixed" => {
                    if self.sampling == Sampling::Native {
                        self.sampling = Sampling::FixedStep {
                            step_ms: DEFAULT_STEP_MS,
                        };
                    }
                }
                other => {
                    return Err(AimError::InvalidConfig(format!(
                        "AIM_SAMPLING must be 'native' or 'fixed', got '{}'",
                        other
                    )))
                }
            }
        }
        if let Some(step) = lookup("AIM_STEP_MS") {
            let step_ms = step
                .trim()
                .parse::<i64>()
                .map_err(|e| AimError::InvalidConfig(format!("AIM_STEP_MS: {}", e)))?;
            self.sampling = Sampling::FixedStep { step_ms };
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if let Sampling::FixedStep { step_ms } = self.sampling {
            if step_ms <= 0 {
                return Err(AimError::InvalidConfig(format!(
                    "sampling step must be positive, got {}",
                    step_ms
                )));
            }
        }
        if self.window.before_ms < 0 || self.window.after_ms < 0 {
            return Err(AimError::InvalidConfig(format!(
                "window padding must be non-negative (before {}, after {})",
                self.window.before_ms, self.window.after_ms
            )));
        }
        if self.window.before_ms > MAX_PADDING_MS || self.window.after_ms > MAX_PADDING_MS {
            return Err(AimError::InvalidConfig(format!(
                "window padding must not exceed {}ms (before {}, after {})",
                MAX_PADDING_MS, self.window.before_ms, self.window.after_ms
            )));
        }
        let t = &self.thresholds;
        if !(t.max_angular_distance_deg > 0.0) {
            return Err(AimError::InvalidConfig("max_angular_distance_deg must be positive".into()));
        }
        if t.hit_window_ms < 0 {
            return Err(AimError::InvalidConfig("hit_window_ms must be non-negative".into()));
        }
        if !(t.min_distance > 0.0) {
            return Err(AimError::InvalidConfig("min_distance must be positive".into()));
        }
        Ok(())
    }
}

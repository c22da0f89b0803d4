use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use aim_core::analysis::{Sampling, ShiftMode};
use aim_core::timeline::{ActorId, Weapon};
use aim_core::{AnalysisConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "aimtrace")]
#[command(
    about = "Reconstruct engagement episodes and chart aim geometry",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// NDJSON timeline (stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Attacker client number
    #[arg(long)]
    pub acn: Option<ActorId>,

    /// Target client number
    #[arg(long)]
    pub tcn: Option<ActorId>,

    /// Weapon whose shots are analysed (default RIFLE)
    #[arg(long)]
    pub gun: Option<Weapon>,

    /// Lookback before each shot in ms (default 1000)
    #[arg(long, visible_alias = "interval")]
    pub before: Option<i64>,

    /// Lookahead after each shot in ms (default 0)
    #[arg(long)]
    pub after: Option<i64>,

    /// Output directory, created if missing
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Latency compensation: attacker, target or none (default attacker)
    #[arg(long)]
    pub shift: Option<ShiftMode>,

    /// Fixed sampling step in ms (default 10)
    #[arg(long, conflicts_with = "native")]
    pub step: Option<i64>,

    /// Sample at every recorded tick instead of a fixed step
    #[arg(long)]
    pub native: bool,

    /// Output format: json or csv
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// YAML or JSON analysis config; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub summary: bool,

    /// Debug-level logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Print usage and exit
    #[arg(long)]
    pub usage: bool,
}

impl Cli {
    /// Both actor ids were given and usage was not requested.
    pub fn wants_run(&self) -> bool {
        !self.usage && self.acn.is_some() && self.tcn.is_some()
    }

    /// Config file (or defaults), then `AIM_*` variables, then flags.
    pub fn build_config(&self) -> Result<AnalysisConfig> {
        self.build_config_with(|key| std::env::var(key).ok())
    }

    /// Same layering with `AIM_*` variables read through `lookup`.
    pub fn build_config_with<F>(&self, lookup: F) -> Result<AnalysisConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match &self.config {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };
        let mut config = base.apply_overrides_from(lookup)?;

        if let Some(acn) = self.acn {
            config.attacker = acn;
        }
        if let Some(tcn) = self.tcn {
            config.target = tcn;
        }
        if let Some(gun) = self.gun {
            config.weapon = gun;
        }
        if let Some(before) = self.before {
            config.window.before_ms = before;
        }
        if let Some(after) = self.after {
            config.window.after_ms = after;
        }
        if let Some(shift) = self.shift {
            config.shift = shift;
        }
        if let Some(step_ms) = self.step {
            config.sampling = Sampling::FixedStep { step_ms };
        }
        if self.native {
            config.sampling = Sampling::Native;
        }

        config.validate()?;
        Ok(config)
    }
}

//! aimtrace CLI
//!
//! NDJSON match timeline -> per-episode aim geometry charts

mod cli;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use aim_core::timeline::{read_ndjson_from, IngestStats};
use aim_core::{analyze, load_ndjson, render_all, renderer_for, AnalysisSummary, InMemoryTimeline};
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if !cli.wants_run() {
        // Help text on stdout, not an error
        if let Err(e) = Cli::command().print_help() {
            eprintln!("aimtrace: {}", e);
        }
        println!();
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("aimtrace: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.build_config()?;

    let (timeline, stats) = load_timeline(cli)?;
    info!(
        "Loaded {} lines: {} positions, {} latency samples, {} events ({} skipped)",
        stats.lines, stats.positions, stats.latencies, stats.events, stats.skipped
    );

    let episodes = analyze(&timeline, &config);

    let renderer = renderer_for(cli.format, &cli.dir)
        .with_context(|| format!("creating {}", cli.dir.display()))?;
    let written = render_all(renderer.as_ref(), &config, &episodes)?;
    for path in &written {
        info!("Wrote {}", path.display());
    }

    if cli.summary {
        let summary = AnalysisSummary::of(&episodes);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn load_timeline(cli: &Cli) -> Result<(InMemoryTimeline, IngestStats)> {
    match &cli.input {
        Some(path) if path.as_os_str() != "-" => {
            load_ndjson(path).with_context(|| format!("reading timeline {}", path.display()))
        }
        _ => read_ndjson_from(io::stdin().lock()).context("reading timeline from stdin"),
    }
}
